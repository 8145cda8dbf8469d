//! Note collection and current-note selection.
//!
//! # Responsibility
//! - Own CRUD and selection over the note collection.
//! - Mirror the full collection into `NOTES_KEY` after every collection
//!   change.
//!
//! # Invariants
//! - Note ids are unique within the collection.
//! - At most one note is current. The current note is a working copy: its
//!   content edits stay a draft until `save_note` writes it back.
//! - An empty collection is stored as an absent key, never as `[]`. A
//!   reload after deleting every note therefore re-seeds the welcome note.
//! - A payload that could not be read is never removed by `load`.
//! - No operation returns an error; failures are logged and notified.

use crate::clock::Clock;
use crate::model::note::Note;
use crate::notify::{Notification, Notifier};
use crate::storage::{KeyValueStore, NOTES_KEY};
use log::{error, info, warn};
use std::rc::Rc;

/// Owns the note collection for one session.
pub struct NoteStore<S: KeyValueStore> {
    storage: S,
    notes: Vec<Note>,
    current: Option<Note>,
    notifier: Rc<dyn Notifier>,
    clock: Rc<dyn Clock>,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Creates an empty, unloaded store. Call `load` before use.
    pub fn new(storage: S, notifier: Rc<dyn Notifier>, clock: Rc<dyn Clock>) -> Self {
        Self {
            storage,
            notes: Vec::new(),
            current: None,
            notifier,
            clock,
        }
    }

    /// Replaces in-memory state with the persisted collection.
    ///
    /// - Absent key: seeds one welcome note and makes it current.
    /// - Unreadable or malformed payload: notifies, continues empty.
    /// - Valid payload: current note is the one with the latest
    ///   `updated_at`, first in persisted order on ties.
    ///
    /// A parsed or malformed payload is written back afterwards, so a
    /// malformed payload is dropped from storage just like an emptied
    /// collection. A failed read leaves storage untouched.
    pub fn load(&mut self) {
        self.current = None;
        let raw = match self.storage.get(NOTES_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                self.report_load_failure("storage_read_failed", &err.to_string());
                // The unread payload stays in storage until the next mutation.
                self.notes = Vec::new();
                return;
            }
        };

        let Some(raw) = raw else {
            let welcome = Note::welcome(self.clock.now());
            info!(
                "event=notes_load module=store status=seeded note_id={}",
                welcome.id
            );
            self.current = Some(welcome.clone());
            self.set_notes(vec![welcome]);
            return;
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                self.current = most_recently_updated(&notes).cloned();
                info!(
                    "event=notes_load module=store status=ok count={}",
                    notes.len()
                );
                self.set_notes(notes);
            }
            Err(err) => {
                self.report_load_failure("notes_parse_failed", &err.to_string());
                self.set_notes(Vec::new());
            }
        }
    }

    /// Creates a blank note, prepends it and makes it current.
    ///
    /// An unsaved draft of the previously current note is discarded.
    pub fn create_new_note(&mut self) -> Note {
        let note = Note::new(self.clock.now());
        let mut notes = Vec::with_capacity(self.notes.len() + 1);
        notes.push(note.clone());
        notes.extend(self.notes.iter().cloned());

        info!("event=note_create module=store status=ok note_id={}", note.id);
        self.current = Some(note.clone());
        self.set_notes(notes);
        note
    }

    /// Replaces the current note's draft content and recomputes its title.
    ///
    /// No-op without a current note. Neither `updated_at` nor storage is
    /// touched.
    pub fn update_note_content(&mut self, content: impl Into<String>) {
        if let Some(current) = self.current.as_mut() {
            current.set_content(content);
        }
    }

    /// Commits the current note: stamps `updated_at`, writes it back into
    /// the collection and persists.
    ///
    /// Returns `None` without a current note.
    pub fn save_note(&mut self) -> Option<Note> {
        let mut saved = self.current.clone()?;
        saved.touch(self.clock.now());

        let notes = self
            .notes
            .iter()
            .map(|note| {
                if note.id == saved.id {
                    saved.clone()
                } else {
                    note.clone()
                }
            })
            .collect();

        info!("event=note_save module=store status=ok note_id={}", saved.id);
        self.current = Some(saved.clone());
        self.set_notes(notes);
        self.notifier.notify(Notification::success("Note saved"));
        Some(saved)
    }

    /// Removes the note with `id`.
    ///
    /// When the removed note was current, the first remaining note becomes
    /// current, or none when the collection is empty. Unknown ids leave the
    /// collection and storage untouched.
    pub fn delete_note(&mut self, id: &str) {
        let before = self.notes.len();
        let remaining: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();

        if remaining.len() == before {
            warn!("event=note_delete module=store status=skipped reason=not_found note_id={id}");
        } else {
            if self.current_note_id() == Some(id) {
                self.current = remaining.first().cloned();
            }
            info!(
                "event=note_delete module=store status=ok note_id={} remaining={}",
                id,
                remaining.len()
            );
            self.set_notes(remaining);
        }

        self.notifier.notify(Notification::info("Note deleted"));
    }

    /// Makes the note with `id` current. Returns `false` for unknown ids.
    ///
    /// The previous current note's unsaved draft is discarded.
    pub fn select_note(&mut self, id: &str) -> bool {
        match self.notes.iter().find(|note| note.id == id) {
            Some(note) => {
                self.current = Some(note.clone());
                true
            }
            None => false,
        }
    }

    /// Notes in collection order (newest created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Working copy of the current note, including unsaved edits.
    pub fn current_note(&self) -> Option<&Note> {
        self.current.as_ref()
    }

    pub fn current_note_id(&self) -> Option<&str> {
        self.current.as_ref().map(|note| note.id.as_str())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.sync_storage();
    }

    fn sync_storage(&mut self) {
        let result = if self.notes.is_empty() {
            self.storage.remove(NOTES_KEY).map_err(|err| err.to_string())
        } else {
            serde_json::to_string(&self.notes)
                .map_err(|err| err.to_string())
                .and_then(|payload| {
                    self.storage
                        .set(NOTES_KEY, &payload)
                        .map_err(|err| err.to_string())
                })
        };

        if let Err(err) = result {
            error!(
                "event=notes_persist module=store status=error count={} error={}",
                self.notes.len(),
                err
            );
            self.notifier.notify(
                Notification::error("Failed to persist notes")
                    .with_detail("Changes are kept in memory only"),
            );
        }
    }

    fn report_load_failure(&self, error_code: &str, err: &str) {
        error!("event=notes_load module=store status=error error_code={error_code} error={err}");
        self.notifier.notify(
            Notification::error("Error loading notes").with_detail("Failed to load saved notes"),
        );
    }
}

fn most_recently_updated(notes: &[Note]) -> Option<&Note> {
    notes.iter().fold(None, |best: Option<&Note>, note| match best {
        Some(best) if note.updated_at <= best.updated_at => Some(best),
        _ => Some(note),
    })
}

#[cfg(test)]
mod tests {
    use super::most_recently_updated;
    use crate::model::note::Note;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn most_recent_prefers_first_on_ties() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let first = Note::with_id("a", base);
        let second = Note::with_id("b", base);
        let mut third = Note::with_id("c", base);
        third.touch(base + Duration::seconds(1));
        let fourth = {
            let mut note = Note::with_id("d", base);
            note.touch(base + Duration::seconds(1));
            note
        };

        let notes = vec![first.clone(), second];
        assert_eq!(most_recently_updated(&notes).unwrap().id, "a");

        let notes = vec![first, third, fourth];
        assert_eq!(most_recently_updated(&notes).unwrap().id, "c");
        assert!(most_recently_updated(&[]).is_none());
    }
}
