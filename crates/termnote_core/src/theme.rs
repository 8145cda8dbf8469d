//! Dark/light theme flag.
//!
//! # Responsibility
//! - Hold the process-wide theme setting for one session.
//! - Load and persist the flag under `THEME_KEY`.
//!
//! # Invariants
//! - Unknown persisted values fall back to `Theme::default()`.

use crate::storage::{KeyValueStore, StorageResult, THEME_KEY};
use log::warn;

/// Two-valued display theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parses `dark` / `light`, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Mutable theme setting owned by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeState {
    current: Theme,
}

impl ThemeState {
    pub fn new(theme: Theme) -> Self {
        Self { current: theme }
    }

    /// Reads the persisted flag, falling back to the default theme.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        match storage.get(THEME_KEY) {
            Ok(Some(raw)) => match Theme::parse(&raw) {
                Some(theme) => Self::new(theme),
                None => {
                    warn!("event=theme_load module=theme status=fallback reason=unknown_value");
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(err) => {
                warn!("event=theme_load module=theme status=fallback reason=storage error={err}");
                Self::default()
            }
        }
    }

    pub fn persist(&self, storage: &mut dyn KeyValueStore) -> StorageResult<()> {
        storage.set(THEME_KEY, self.current.as_str())
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Switches to `theme`. Returns whether the setting changed.
    pub fn set(&mut self, theme: Theme) -> bool {
        if self.current == theme {
            return false;
        }
        self.current = theme;
        true
    }

    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        self.current
    }
}
