use chrono::{Duration, TimeZone, Utc};
use std::rc::Rc;
use termnote_core::{
    CommandOutcome, EditorMode, Key, KeyValueStore, ManualClock, MemoryStore, NotificationLog,
    Notifier, RecordingExporter, Session, SqliteStore, Theme, NOTES_KEY, THEME_KEY,
    WELCOME_NOTE_CONTENT, WELCOME_NOTE_TITLE,
};

#[test]
fn open_binds_editor_to_seeded_welcome_note() {
    let fixture = Fixture::open(MemoryStore::new());
    let session = &fixture.session;

    assert_eq!(session.notes().len(), 1);
    assert_eq!(session.current_note().unwrap().title, WELCOME_NOTE_TITLE);
    assert_eq!(session.editor().buffer(), WELCOME_NOTE_CONTENT);
    assert_eq!(session.mode(), EditorMode::Edit);
    assert_eq!(session.theme(), Theme::Dark);
}

#[test]
fn typing_then_saving_commits_title_and_timestamp() {
    let mut fixture = Fixture::open(MemoryStore::new());
    fixture.session.create_new_note();
    fixture.clock.advance(Duration::seconds(10));

    let outcomes = fixture
        .session
        .handle_keys(Key::parse_script("Hello<CR>world<C-s>"));
    assert!(outcomes.is_empty());

    let current = fixture.session.current_note().unwrap();
    assert_eq!(current.title, "Hello");
    assert_eq!(current.content, "Hello\nworld");
    assert!(current.updated_at > current.created_at);
    assert_eq!(fixture.session.notes()[0], *current);
    assert_eq!(fixture.log.last().unwrap().message, "Note saved");

    let raw = fixture.session.storage().get(NOTES_KEY).unwrap().unwrap();
    assert!(raw.contains("Hello\\nworld"));
}

#[test]
fn command_typed_into_empty_note_runs_and_restores_buffer() {
    let mut fixture = Fixture::open(MemoryStore::new());
    fixture.session.create_new_note();

    let outcomes = fixture.session.handle_keys(Key::parse_script(":light<CR>"));
    assert_eq!(outcomes, vec![CommandOutcome::ThemeChanged(Theme::Light)]);
    assert_eq!(fixture.session.mode(), EditorMode::Edit);
    assert_eq!(fixture.session.editor().buffer(), "");
    assert_eq!(fixture.session.current_note().unwrap().content, "");
    assert_eq!(
        fixture.session.storage().get(THEME_KEY).unwrap().as_deref(),
        Some("light")
    );
}

#[test]
fn colon_in_non_empty_note_is_literal_text() {
    let mut fixture = Fixture::open(MemoryStore::new());
    fixture.session.create_new_note();

    let outcomes = fixture.session.handle_keys(Key::parse_script("a:dark<CR>"));
    assert!(outcomes.is_empty());
    assert_eq!(fixture.session.mode(), EditorMode::Edit);
    assert_eq!(fixture.session.current_note().unwrap().content, "a:dark\n");
    assert_eq!(fixture.session.theme(), Theme::Dark);
}

#[test]
fn escape_cancels_command_and_restores_note_content() {
    let mut fixture = Fixture::open(MemoryStore::new());
    fixture.session.create_new_note();

    fixture.session.handle_keys(Key::parse_script(":export"));
    assert_eq!(fixture.session.mode(), EditorMode::Command);
    assert_eq!(fixture.session.editor().buffer(), ":export");

    let outcomes = fixture.session.handle_keys([Key::Escape]);
    assert!(outcomes.is_empty());
    assert_eq!(fixture.session.mode(), EditorMode::Edit);
    assert_eq!(fixture.session.editor().buffer(), "");
    assert!(fixture.exporter.deliveries().is_empty());
}

#[test]
fn commands_stay_reachable_without_any_note() {
    let mut fixture = Fixture::open(MemoryStore::new());
    let welcome_id = fixture.session.notes()[0].id.clone();
    fixture.session.delete_note(&welcome_id);
    assert!(fixture.session.is_input_inert());
    assert_eq!(fixture.session.editor().buffer(), "");

    fixture.session.handle_keys(Key::parse_script("typed"));
    assert_eq!(fixture.session.editor().buffer(), "");

    let outcomes = fixture.session.handle_keys(Key::parse_script(":export<CR>"));
    assert_eq!(outcomes, vec![CommandOutcome::NothingToExport]);
    assert_eq!(fixture.log.last().unwrap().message, "No notes to export");
}

#[test]
fn ctrl_n_creates_note_while_command_is_typed() {
    let mut fixture = Fixture::open(MemoryStore::new());
    fixture.session.create_new_note();
    fixture.session.handle_keys(Key::parse_script(":he"));

    fixture.session.handle_key(Key::NewNote);
    assert_eq!(fixture.session.notes().len(), 3);
    assert_eq!(fixture.session.mode(), EditorMode::Command);
    assert_eq!(fixture.session.editor().buffer(), ":he");

    let outcomes = fixture.session.handle_keys(Key::parse_script("lp<CR>"));
    assert_eq!(outcomes, vec![CommandOutcome::HelpShown]);
    assert_eq!(fixture.session.editor().buffer(), "");
}

#[test]
fn selecting_a_note_resyncs_the_buffer() {
    let mut fixture = Fixture::open(MemoryStore::new());
    let welcome_id = fixture.session.notes()[0].id.clone();
    fixture.session.create_new_note();
    fixture.session.set_text("scratch");

    assert!(fixture.session.select_note(&welcome_id));
    assert_eq!(fixture.session.editor().buffer(), WELCOME_NOTE_CONTENT);
    assert!(!fixture.session.select_note("missing"));
}

#[test]
fn export_command_delivers_current_persisted_payload() {
    let mut fixture = Fixture::open(MemoryStore::new());
    fixture.session.create_new_note();

    let outcome = fixture.session.run_command("export");
    assert_eq!(
        outcome,
        CommandOutcome::Exported {
            file_name: "term-notes-2024-05-01.json".to_string()
        }
    );
    let deliveries = fixture.exporter.deliveries();
    let persisted = fixture.session.storage().get(NOTES_KEY).unwrap().unwrap();
    assert_eq!(deliveries[0].1, persisted);
}

#[test]
fn sqlite_backed_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");

    let saved_id = {
        let mut fixture = Fixture::open(SqliteStore::open(&path).unwrap());
        fixture.session.create_new_note();
        fixture
            .session
            .handle_keys(Key::parse_script("Groceries<CR>milk<C-s>"));
        fixture.session.toggle_theme();
        fixture.session.current_note().unwrap().id.clone()
    };

    let fixture = Fixture::open(SqliteStore::open(&path).unwrap());
    assert_eq!(fixture.session.notes().len(), 2);
    assert_eq!(fixture.session.current_note().unwrap().id, saved_id);
    assert_eq!(fixture.session.current_note().unwrap().title, "Groceries");
    assert_eq!(fixture.session.theme(), Theme::Light);
}

#[test]
fn unsaved_edits_do_not_win_current_selection_on_reload() {
    let mut fixture = Fixture::open(MemoryStore::new());
    let welcome_id = fixture.session.notes()[0].id.clone();
    let drafted = fixture.session.create_new_note();

    fixture.clock.advance(Duration::seconds(5));
    fixture.session.select_note(&welcome_id);
    fixture.session.save_note();

    fixture.clock.advance(Duration::seconds(5));
    fixture.session.select_note(&drafted.id);
    fixture.session.handle_keys(Key::parse_script("draft only"));
    assert_eq!(fixture.session.current_note().unwrap().content, "draft only");

    let storage = fixture.session.into_storage();
    let reopened = Fixture::open(storage);
    assert_eq!(reopened.session.current_note().unwrap().id, welcome_id);
}

struct Fixture<S: KeyValueStore> {
    session: Session<S>,
    log: Rc<NotificationLog>,
    exporter: Rc<RecordingExporter>,
    clock: Rc<ManualClock>,
}

impl<S: KeyValueStore> Fixture<S> {
    fn open(storage: S) -> Self {
        let log = Rc::new(NotificationLog::new());
        let exporter = Rc::new(RecordingExporter::new());
        let clock = Rc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        ));
        let notifier: Rc<dyn Notifier> = log.clone();
        let session = Session::open(
            storage,
            Box::new(exporter.clone()),
            notifier,
            clock.clone(),
        );
        Self {
            session,
            log,
            exporter,
            clock,
        }
    }
}
