//! Domain model for persisted notes.
//!
//! # Responsibility
//! - Define the single persisted entity (`Note`) and its JSON shape.
//! - Own title derivation rules shared by store and editor paths.
//!
//! # Invariants
//! - Every note is identified by a stable, opaque string id.
//! - `updated_at >= created_at` for notes created by this crate.

pub mod note;
