//! In-memory note collection with write-through persistence.
//!
//! # See also
//! - `storage` for the key-value contract the store writes through.

pub mod note_store;

pub use note_store::NoteStore;
