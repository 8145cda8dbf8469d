//! Terminal-style editor surface.
//!
//! # Responsibility
//! - Model key input and the edit/command mode state machine.
//!
//! # See also
//! - `session` for how editor actions reach the store and dispatcher.

pub mod input;
pub mod key;
pub mod mode;

pub use input::{Editor, EditorAction, COMMAND_MARKER};
pub use key::Key;
pub use mode::EditorMode;
