//! Line-oriented console over a `Session`.
//!
//! # Responsibility
//! - Translate input lines into key events or list/page actions.
//! - Render notifications, the notes list and editor status.
//!
//! # Invariants
//! - Every non-meta line is a key script followed by an implicit Enter,
//!   unless the line ends with `\`.

use std::io::{self, BufRead, Write};
use termnote_core::{
    logging_status, EditorMode, Key, KeyValueStore, Note, Notification, NotificationLog, Session,
    Severity,
};

const META_PREFIX: char = '\\';
const NO_ENTER_SUFFIX: char = '\\';

const CONSOLE_HELP: &str = "\
Type to edit the current note. Start an empty note with ':' to enter a command.
Key script: <CR> Enter, <BS> Backspace, <Esc> Escape, <C-s> save, <C-n> new note, <lt> '<'.
End a line with '\\' to suppress the implicit Enter.
Meta: \\list  \\select N  \\delete N  \\new  \\save  \\theme  \\show  \\run CMD  \\help  \\quit";

/// Page-level action typed with a leading backslash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaCommand {
    List,
    Select(usize),
    Delete(usize),
    New,
    Save,
    Theme,
    Show,
    Run(String),
    Help,
    Quit,
    Invalid(String),
}

/// Interpretation of one console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Meta(MetaCommand),
    Keys(Vec<Key>),
}

/// Parses one line without its trailing newline.
pub fn parse_line(line: &str) -> ConsoleInput {
    if let Some(meta) = line.strip_prefix(META_PREFIX) {
        return ConsoleInput::Meta(parse_meta(meta));
    }

    match line.strip_suffix(NO_ENTER_SUFFIX) {
        Some(script) => ConsoleInput::Keys(Key::parse_script(script)),
        None => {
            let mut keys = Key::parse_script(line);
            keys.push(Key::Enter);
            ConsoleInput::Keys(keys)
        }
    }
}

fn parse_meta(meta: &str) -> MetaCommand {
    let mut parts = meta.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    let arg = parts.next().map(str::trim).unwrap_or("");

    match name.as_str() {
        "list" | "ls" => MetaCommand::List,
        "select" | "open" => parse_index(arg).map_or_else(
            || MetaCommand::Invalid(meta.to_string()),
            MetaCommand::Select,
        ),
        "delete" | "rm" => parse_index(arg).map_or_else(
            || MetaCommand::Invalid(meta.to_string()),
            MetaCommand::Delete,
        ),
        "new" => MetaCommand::New,
        "save" => MetaCommand::Save,
        "theme" => MetaCommand::Theme,
        "show" => MetaCommand::Show,
        "run" if !arg.is_empty() => MetaCommand::Run(arg.to_string()),
        "help" => MetaCommand::Help,
        "quit" | "q" | "exit" => MetaCommand::Quit,
        _ => MetaCommand::Invalid(meta.to_string()),
    }
}

/// Parses a 1-based list position.
fn parse_index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|index| *index > 0)
}

/// Runs the console until `\quit` or end of input.
pub fn run<S, R, W>(
    session: &mut Session<S>,
    notifications: &NotificationLog,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "term-notes {} (\\help for usage)", termnote_core::core_version())?;
    flush_notifications(notifications, out)?;
    write_status(session, out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');

        match parse_line(line) {
            ConsoleInput::Meta(MetaCommand::Quit) => break,
            ConsoleInput::Meta(meta) => apply_meta(session, meta, out)?,
            ConsoleInput::Keys(keys) => {
                session.handle_keys(keys);
            }
        }

        flush_notifications(notifications, out)?;
        write_status(session, out)?;
    }

    out.flush()
}

fn apply_meta<S: KeyValueStore, W: Write>(
    session: &mut Session<S>,
    meta: MetaCommand,
    out: &mut W,
) -> io::Result<()> {
    match meta {
        MetaCommand::List => write_list(session, out)?,
        MetaCommand::Select(index) => match note_id_at(session, index) {
            Some(id) => {
                session.select_note(&id);
            }
            None => writeln!(out, "no note #{index}")?,
        },
        MetaCommand::Delete(index) => match note_id_at(session, index) {
            Some(id) => session.delete_note(&id),
            None => writeln!(out, "no note #{index}")?,
        },
        MetaCommand::New => {
            session.create_new_note();
        }
        MetaCommand::Save => {
            session.save_note();
        }
        MetaCommand::Theme => {
            session.toggle_theme();
        }
        MetaCommand::Show => writeln!(out, "{}", session.editor().buffer())?,
        MetaCommand::Run(command) => {
            session.run_command(&command);
        }
        MetaCommand::Help => {
            writeln!(out, "{}", CONSOLE_HELP)?;
            match logging_status() {
                Some((level, dir)) => writeln!(out, "Logging: {level} to {}", dir.display())?,
                None => writeln!(out, "Logging: off")?,
            }
        }
        MetaCommand::Invalid(raw) => writeln!(out, "unknown console action: \\{raw}")?,
        MetaCommand::Quit => {}
    }
    Ok(())
}

fn note_id_at<S: KeyValueStore>(session: &Session<S>, index: usize) -> Option<String> {
    session
        .notes()
        .get(index.checked_sub(1)?)
        .map(|note| note.id.clone())
}

fn write_list<S: KeyValueStore, W: Write>(session: &Session<S>, out: &mut W) -> io::Result<()> {
    if session.notes().is_empty() {
        return writeln!(out, "(no notes)");
    }

    let current_id = session.current_note().map(|note| note.id.as_str());
    for (position, note) in session.notes().iter().enumerate() {
        let marker = if Some(note.id.as_str()) == current_id {
            '*'
        } else {
            ' '
        };
        writeln!(
            out,
            "{:>3}{} {}  ({})",
            position + 1,
            marker,
            list_title(session, note),
            note.updated_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(())
}

/// The current note shows its live draft title.
fn list_title<'a, S: KeyValueStore>(session: &'a Session<S>, note: &'a Note) -> &'a str {
    match session.current_note() {
        Some(current) if current.id == note.id => &current.title,
        _ => &note.title,
    }
}

fn write_status<S: KeyValueStore, W: Write>(session: &Session<S>, out: &mut W) -> io::Result<()> {
    let theme = session.theme().as_str();
    match session.mode() {
        EditorMode::Command => writeln!(
            out,
            "-- COMMAND -- {} | ESC to cancel [{theme}]",
            session.editor().buffer()
        ),
        EditorMode::Edit => match session.current_note() {
            Some(note) => writeln!(out, "-- EDIT -- {} [{theme}]", note.title),
            None => writeln!(
                out,
                "-- EDIT -- (no note: \\new to create one, ':' for commands) [{theme}]"
            ),
        },
    }
}

fn flush_notifications<W: Write>(notifications: &NotificationLog, out: &mut W) -> io::Result<()> {
    for notification in notifications.take() {
        writeln!(out, "{}", format_notification(&notification))?;
    }
    Ok(())
}

fn format_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Error => "error",
    };
    match notification.detail.as_deref() {
        Some(detail) => format!("[{tag}] {}: {detail}", notification.message),
        None => format!("[{tag}] {}", notification.message),
    }
}
