//! Application session wiring store, theme, dispatcher and editor.
//!
//! # Responsibility
//! - Construct and load all per-process state in one place.
//! - Route editor actions to the note store and command dispatcher.
//! - Handle list-display events (select, delete) and page shortcuts.
//!
//! # Invariants
//! - After every operation that can change the current note, the editor is
//!   resynchronized (a no-op while a command is being typed).
//! - Theme changes are persisted under `THEME_KEY` on a best-effort basis.

use crate::clock::Clock;
use crate::command::export::Exporter;
use crate::command::{CommandDispatcher, CommandOutcome};
use crate::editor::{Editor, EditorAction, EditorMode, Key};
use crate::model::note::Note;
use crate::notify::{Notification, Notifier};
use crate::storage::KeyValueStore;
use crate::store::NoteStore;
use crate::theme::{Theme, ThemeState};
use log::warn;
use std::rc::Rc;

/// All state of one running app instance.
pub struct Session<S: KeyValueStore> {
    store: NoteStore<S>,
    theme: ThemeState,
    editor: Editor,
    dispatcher: CommandDispatcher,
    notifier: Rc<dyn Notifier>,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads notes and theme from `storage` and binds the editor.
    pub fn open(
        storage: S,
        exporter: Box<dyn Exporter>,
        notifier: Rc<dyn Notifier>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let theme = ThemeState::load(&storage);
        let mut store = NoteStore::new(storage, notifier.clone(), clock.clone());
        store.load();

        let mut session = Self {
            store,
            theme,
            editor: Editor::new(),
            dispatcher: CommandDispatcher::new(exporter, notifier.clone(), clock),
            notifier,
        };
        session.sync_editor();
        session
    }

    /// Feeds one key event through the editor and routes its action.
    ///
    /// Returns the outcome when the key committed a command.
    pub fn handle_key(&mut self, key: Key) -> Option<CommandOutcome> {
        let action = self.editor.handle_key(key, self.store.current_note())?;
        self.apply(action)
    }

    /// Feeds a sequence of key events; collects command outcomes.
    pub fn handle_keys(&mut self, keys: impl IntoIterator<Item = Key>) -> Vec<CommandOutcome> {
        keys.into_iter()
            .filter_map(|key| self.handle_key(key))
            .collect()
    }

    /// Replaces the editor buffer wholesale.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if let Some(action) = self.editor.set_text(text, self.store.current_note()) {
            self.apply(action);
        }
    }

    /// Selects a note from the list display.
    pub fn select_note(&mut self, id: &str) -> bool {
        let selected = self.store.select_note(id);
        self.sync_editor();
        selected
    }

    /// Deletes a note from the list display.
    pub fn delete_note(&mut self, id: &str) {
        self.store.delete_note(id);
        self.sync_editor();
    }

    /// Page-level new-note action (button or Ctrl/Cmd+N).
    pub fn create_new_note(&mut self) -> Note {
        let note = self.store.create_new_note();
        self.notifier.notify(Notification::success("New note created"));
        self.sync_editor();
        note
    }

    /// Page-level save action.
    pub fn save_note(&mut self) -> Option<Note> {
        let saved = self.store.save_note();
        self.sync_editor();
        saved
    }

    /// Dispatches a command string (without the `:` marker).
    pub fn run_command(&mut self, input: &str) -> CommandOutcome {
        let outcome = self
            .dispatcher
            .dispatch(input, &mut self.theme, self.store.storage());
        if let CommandOutcome::ThemeChanged(_) = outcome {
            self.persist_theme();
        }
        self.sync_editor();
        outcome
    }

    /// Flips the theme, like the header toggle button.
    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.theme.toggle();
        self.persist_theme();
        theme
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    pub fn current_note(&self) -> Option<&Note> {
        self.store.current_note()
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn mode(&self) -> EditorMode {
        self.editor.mode()
    }

    /// Whether the input surface currently ignores typing.
    pub fn is_input_inert(&self) -> bool {
        self.editor.is_inert(self.store.current_note())
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }

    fn apply(&mut self, action: EditorAction) -> Option<CommandOutcome> {
        match action {
            EditorAction::ContentChanged(content) => {
                self.store.update_note_content(content);
                None
            }
            EditorAction::SubmitCommand(command) => Some(self.run_command(&command)),
            EditorAction::CommandCancelled => {
                self.sync_editor();
                None
            }
            EditorAction::Save => {
                self.save_note();
                None
            }
            EditorAction::NewNote => {
                self.create_new_note();
                None
            }
        }
    }

    fn persist_theme(&mut self) {
        if let Err(err) = self.theme.persist(self.store.storage_mut()) {
            warn!("event=theme_persist module=session status=error error={err}");
        }
    }

    fn sync_editor(&mut self) {
        self.editor.sync_to_note(self.store.current_note());
    }
}
