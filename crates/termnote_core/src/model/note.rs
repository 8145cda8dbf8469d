//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted under the `notes` key.
//! - Derive display titles from note content.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - Timestamps are serialized as ISO-8601 UTC with millisecond precision,
//!   matching the JSON produced by earlier versions of the app.
//! - `title` falls back to `DEFAULT_NOTE_TITLE` when the first content line
//!   is blank.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used when a note has no meaningful first line.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";
/// Title of the note seeded into an empty store.
pub const WELCOME_NOTE_TITLE: &str = "Welcome Note";
/// Body of the note seeded into an empty store.
pub const WELCOME_NOTE_CONTENT: &str = "Welcome to term-note-scribe!\n\nStart typing to create your first note.\n\nTips:\n- Use \":\" to enter command mode\n- Type \"help\" for available commands";

/// Opaque note identifier.
///
/// Persisted data from older versions uses timestamp strings, new notes use
/// UUID v4 strings; both are accepted.
pub type NoteId = String;

/// Persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Stable identifier, unique within the collection.
    pub id: NoteId,
    /// Display title derived from the first content line.
    pub title: String,
    /// Editable text body.
    pub content: String,
    /// Creation instant. Never changes after construction.
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
    /// Instant of the last explicit save.
    #[serde(with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates an empty note with a generated id.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now` (truncated to milliseconds).
    /// - Title starts as `DEFAULT_NOTE_TITLE`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), now)
    }

    /// Creates an empty note with a caller-provided id.
    pub fn with_id(id: impl Into<NoteId>, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id: id.into(),
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates the seeded welcome note.
    pub fn welcome(now: DateTime<Utc>) -> Self {
        let mut note = Self::new(now);
        note.title = WELCOME_NOTE_TITLE.to_string();
        note.content = WELCOME_NOTE_CONTENT.to_string();
        note
    }

    /// Replaces the body and recomputes the title. Timestamps are untouched.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.title = derive_title(&self.content);
    }

    /// Stamps an explicit save.
    ///
    /// Clock skew never moves `updated_at` before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let now = now.trunc_subsecs(3);
        self.updated_at = if now < self.created_at {
            self.created_at
        } else {
            now
        };
    }
}

/// Derives a display title from the trimmed first line of `content`.
pub fn derive_title(content: &str) -> String {
    content
        .split('\n')
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unwrap_or(DEFAULT_NOTE_TITLE)
        .to_string()
}

mod iso_millis {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        EpochMillis(i64),
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Accepts RFC 3339, offset-less date-times and dates (read as UTC), and
    /// epoch milliseconds.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(raw) => parse_text(raw.trim()).ok_or_else(|| {
                serde::de::Error::custom(format!("unrecognized timestamp `{raw}`"))
            }),
            RawTimestamp::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {millis}"))),
        }
    }

    pub(super) fn parse_text(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }
        for format in NAIVE_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(value.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|value| value.and_utc())
    }
}
