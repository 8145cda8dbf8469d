//! Two-mode input buffer.
//!
//! # Responsibility
//! - Interpret key events as note edits or command entry.
//! - Emit `EditorAction`s for the session to route; never touch the store
//!   directly.
//!
//! # Invariants
//! - `Command` mode is entered only from an empty buffer via `:`.
//! - Leaving `Command` mode always restores the current note's content, or
//!   an empty buffer when no note is selected.
//! - In `Edit` mode without a selected note the buffer is inert.

use super::key::Key;
use super::mode::EditorMode;
use crate::model::note::Note;

/// Character that switches an empty buffer into command mode.
pub const COMMAND_MARKER: char = ':';

/// Effect requested by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Edit-mode buffer changed; carries the full new content.
    ContentChanged(String),
    /// Command committed; marker already stripped.
    SubmitCommand(String),
    /// Command entry abandoned.
    CommandCancelled,
    Save,
    NewNote,
}

/// Single text-input surface shared by note editing and command entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Editor {
    mode: EditorMode,
    buffer: String,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Whether typed text is ignored: edit mode with nothing selected.
    pub fn is_inert(&self, current: Option<&Note>) -> bool {
        self.mode == EditorMode::Edit && current.is_none()
    }

    /// Applies one key event.
    ///
    /// `current` is the note bound to the editor, if any.
    pub fn handle_key(&mut self, key: Key, current: Option<&Note>) -> Option<EditorAction> {
        match key {
            Key::Save => return Some(EditorAction::Save),
            Key::NewNote => return Some(EditorAction::NewNote),
            _ => {}
        }

        match self.mode {
            EditorMode::Edit => self.handle_edit_key(key, current),
            EditorMode::Command => self.handle_command_key(key, current),
        }
    }

    /// Replaces the whole buffer, as a paste or programmatic change would.
    pub fn set_text(
        &mut self,
        text: impl Into<String>,
        current: Option<&Note>,
    ) -> Option<EditorAction> {
        match self.mode {
            EditorMode::Command => {
                self.buffer = text.into();
                None
            }
            EditorMode::Edit if current.is_some() => {
                self.buffer = text.into();
                Some(EditorAction::ContentChanged(self.buffer.clone()))
            }
            EditorMode::Edit => None,
        }
    }

    /// Rebinds the buffer to `current` after the selection changed.
    ///
    /// Ignored while a command is being typed.
    pub fn sync_to_note(&mut self, current: Option<&Note>) {
        if self.mode == EditorMode::Edit {
            self.restore_from(current);
        }
    }

    fn handle_edit_key(&mut self, key: Key, current: Option<&Note>) -> Option<EditorAction> {
        if key == Key::Char(COMMAND_MARKER) && self.buffer.is_empty() {
            self.mode = EditorMode::Command;
            self.buffer.push(COMMAND_MARKER);
            return None;
        }

        if current.is_none() {
            return None;
        }

        match key {
            Key::Char(ch) => self.buffer.push(ch),
            Key::Enter => self.buffer.push('\n'),
            Key::Backspace => {
                self.buffer.pop()?;
            }
            Key::Escape | Key::Save | Key::NewNote => return None,
        }
        Some(EditorAction::ContentChanged(self.buffer.clone()))
    }

    fn handle_command_key(&mut self, key: Key, current: Option<&Note>) -> Option<EditorAction> {
        match key {
            Key::Char(ch) => {
                self.buffer.push(ch);
                None
            }
            Key::Enter => {
                let command = self
                    .buffer
                    .strip_prefix(COMMAND_MARKER)
                    .unwrap_or(&self.buffer)
                    .to_string();
                self.leave_command_mode(current);
                Some(EditorAction::SubmitCommand(command))
            }
            Key::Escape => {
                self.leave_command_mode(current);
                Some(EditorAction::CommandCancelled)
            }
            Key::Backspace => {
                self.buffer.pop();
                if self.buffer.is_empty() {
                    self.leave_command_mode(current);
                    return Some(EditorAction::CommandCancelled);
                }
                None
            }
            Key::Save | Key::NewNote => None,
        }
    }

    fn leave_command_mode(&mut self, current: Option<&Note>) {
        self.mode = EditorMode::Edit;
        self.restore_from(current);
    }

    fn restore_from(&mut self, current: Option<&Note>) {
        self.buffer.clear();
        if let Some(note) = current {
            self.buffer.push_str(&note.content);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Editor, EditorAction};
    use crate::editor::key::Key;
    use crate::editor::mode::EditorMode;
    use crate::model::note::Note;
    use chrono::Utc;

    fn note_with(content: &str) -> Note {
        let mut note = Note::new(Utc::now());
        note.set_content(content);
        note
    }

    #[test]
    fn colon_on_empty_buffer_enters_command_mode() {
        let note = note_with("");
        let mut editor = Editor::new();
        assert_eq!(editor.handle_key(Key::Char(':'), Some(&note)), None);
        assert_eq!(editor.mode(), EditorMode::Command);
        assert_eq!(editor.buffer(), ":");
    }

    #[test]
    fn colon_on_non_empty_buffer_is_literal() {
        let note = note_with("todo");
        let mut editor = Editor::new();
        editor.sync_to_note(Some(&note));

        let action = editor.handle_key(Key::Char(':'), Some(&note));
        assert_eq!(
            action,
            Some(EditorAction::ContentChanged("todo:".to_string()))
        );
        assert_eq!(editor.mode(), EditorMode::Edit);
    }

    #[test]
    fn enter_commits_command_and_restores_note_content() {
        let note = note_with("body");
        let mut editor = Editor::new();
        editor.handle_key(Key::Char(':'), None);
        for ch in "help".chars() {
            assert_eq!(editor.handle_key(Key::Char(ch), Some(&note)), None);
        }

        let action = editor.handle_key(Key::Enter, Some(&note));
        assert_eq!(action, Some(EditorAction::SubmitCommand("help".to_string())));
        assert_eq!(editor.mode(), EditorMode::Edit);
        assert_eq!(editor.buffer(), "body");
    }

    #[test]
    fn escape_cancels_without_command() {
        let mut editor = Editor::new();
        editor.handle_key(Key::Char(':'), None);
        editor.handle_key(Key::Char('x'), None);

        let action = editor.handle_key(Key::Escape, None);
        assert_eq!(action, Some(EditorAction::CommandCancelled));
        assert_eq!(editor.mode(), EditorMode::Edit);
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn backspace_over_marker_cancels_command_mode() {
        let mut editor = Editor::new();
        editor.handle_key(Key::Char(':'), None);
        editor.handle_key(Key::Char('a'), None);
        assert_eq!(editor.handle_key(Key::Backspace, None), None);
        assert_eq!(
            editor.handle_key(Key::Backspace, None),
            Some(EditorAction::CommandCancelled)
        );
        assert_eq!(editor.mode(), EditorMode::Edit);
    }

    #[test]
    fn edit_keys_are_inert_without_note() {
        let mut editor = Editor::new();
        assert!(editor.is_inert(None));
        assert_eq!(editor.handle_key(Key::Char('a'), None), None);
        assert_eq!(editor.handle_key(Key::Enter, None), None);
        assert_eq!(editor.set_text("pasted", None), None);
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn save_and_new_note_are_recognized_in_any_mode() {
        let mut editor = Editor::new();
        assert_eq!(editor.handle_key(Key::Save, None), Some(EditorAction::Save));
        editor.handle_key(Key::Char(':'), None);
        assert_eq!(editor.handle_key(Key::Save, None), Some(EditorAction::Save));
        assert_eq!(
            editor.handle_key(Key::NewNote, None),
            Some(EditorAction::NewNote)
        );
        assert_eq!(editor.mode(), EditorMode::Command);
        assert_eq!(editor.buffer(), ":");
    }

    #[test]
    fn sync_is_ignored_in_command_mode() {
        let note = note_with("other");
        let mut editor = Editor::new();
        editor.handle_key(Key::Char(':'), None);
        editor.sync_to_note(Some(&note));
        assert_eq!(editor.buffer(), ":");
    }

    #[test]
    fn edit_keys_forward_full_buffer() {
        let note = note_with("");
        let mut editor = Editor::new();
        editor.handle_key(Key::Char('h'), Some(&note));
        editor.handle_key(Key::Char('i'), Some(&note));
        editor.handle_key(Key::Enter, Some(&note));
        let action = editor.handle_key(Key::Backspace, Some(&note));
        assert_eq!(action, Some(EditorAction::ContentChanged("hi".to_string())));
    }
}
