//! Core engine for the term-notes console.
//! Owns notes, persistence, commands and the modal editor input.

pub mod clock;
pub mod command;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod notify;
pub mod session;
pub mod storage;
pub mod store;
pub mod theme;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::export::{
    export_file_name, DirectoryExporter, ExportError, ExportResult, Exporter, RecordingExporter,
};
pub use command::{Command, CommandDispatcher, CommandOutcome, HELP_MESSAGE};
pub use editor::{Editor, EditorAction, EditorMode, Key, COMMAND_MARKER};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{
    derive_title, Note, NoteId, DEFAULT_NOTE_TITLE, WELCOME_NOTE_CONTENT, WELCOME_NOTE_TITLE,
};
pub use notify::{Notification, NotificationLog, Notifier, Severity};
pub use session::Session;
pub use storage::{
    KeyValueStore, MemoryStore, SqliteStore, StorageError, StorageResult, NOTES_KEY, THEME_KEY,
};
pub use store::NoteStore;
pub use theme::{Theme, ThemeState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
