//! Console command parsing and dispatch.
//!
//! # Responsibility
//! - Map a finalized command string to a closed set of commands.
//! - Execute theme, help and export commands and report the outcome.
//!
//! # Invariants
//! - Matching is exact after trimming and ASCII case folding.
//! - Commands never mutate the note collection.
//! - Unknown input is a normal outcome, reported with the original text.

pub mod export;

use crate::clock::Clock;
use crate::notify::{Notification, Notifier};
use crate::storage::{KeyValueStore, NOTES_KEY};
use crate::theme::{Theme, ThemeState};
use export::{export_file_name, Exporter};
use log::{error, info};
use std::rc::Rc;

/// Summary shown by the `help` command.
pub const HELP_MESSAGE: &str = "Available Commands: theme dark/light, help, export";
const HELP_DETAIL: &str = "Type any command to execute";

/// Recognized console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `theme dark`, `dark`, `theme light`, `light`.
    Theme(Theme),
    /// `help`.
    Help,
    /// `export`, `export all`.
    Export,
    /// Anything else; keeps the input exactly as typed.
    Unknown(String),
}

impl Command {
    /// Parses a command string without its `:` marker.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "theme dark" | "dark" => Self::Theme(Theme::Dark),
            "theme light" | "light" => Self::Theme(Theme::Light),
            "help" => Self::Help,
            "export" | "export all" => Self::Export,
            _ => Self::Unknown(input.to_string()),
        }
    }
}

/// Observable result of one dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    ThemeChanged(Theme),
    ThemeUnchanged(Theme),
    HelpShown,
    Exported { file_name: String },
    NothingToExport,
    ExportFailed,
    Unknown(String),
}

/// Executes parsed commands against session state.
pub struct CommandDispatcher {
    exporter: Box<dyn Exporter>,
    notifier: Rc<dyn Notifier>,
    clock: Rc<dyn Clock>,
}

impl CommandDispatcher {
    pub fn new(
        exporter: Box<dyn Exporter>,
        notifier: Rc<dyn Notifier>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            exporter,
            notifier,
            clock,
        }
    }

    /// Parses and executes `input`.
    ///
    /// `storage` is only read, by `export`.
    pub fn dispatch(
        &self,
        input: &str,
        theme: &mut ThemeState,
        storage: &dyn KeyValueStore,
    ) -> CommandOutcome {
        let command = Command::parse(input);
        info!(
            "event=command_dispatch module=command kind={}",
            command_kind(&command)
        );

        match command {
            Command::Theme(target) => self.switch_theme(theme, target),
            Command::Help => {
                self.notifier
                    .notify(Notification::info(HELP_MESSAGE).with_detail(HELP_DETAIL));
                CommandOutcome::HelpShown
            }
            Command::Export => self.export(storage),
            Command::Unknown(raw) => {
                self.notifier.notify(
                    Notification::error(format!("Unknown command: {raw}"))
                        .with_detail("Type \"help\" for available commands"),
                );
                CommandOutcome::Unknown(raw)
            }
        }
    }

    fn switch_theme(&self, theme: &mut ThemeState, target: Theme) -> CommandOutcome {
        if !theme.set(target) {
            return CommandOutcome::ThemeUnchanged(target);
        }

        let message = match target {
            Theme::Dark => "Dark theme activated",
            Theme::Light => "Light theme activated",
        };
        self.notifier.notify(Notification::info(message));
        CommandOutcome::ThemeChanged(target)
    }

    fn export(&self, storage: &dyn KeyValueStore) -> CommandOutcome {
        let payload = match storage.get(NOTES_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                self.notifier.notify(Notification::info("No notes to export"));
                return CommandOutcome::NothingToExport;
            }
            Err(err) => {
                error!("event=export module=command status=error error_code=storage_read_failed error={err}");
                self.notify_export_failed();
                return CommandOutcome::ExportFailed;
            }
        };

        let file_name = export_file_name(self.clock.now().date_naive());
        match self.exporter.deliver(&file_name, &payload) {
            Ok(()) => {
                info!("event=export module=command status=ok file_name={file_name}");
                self.notifier.notify(
                    Notification::success("Notes exported successfully")
                        .with_detail(file_name.clone()),
                );
                CommandOutcome::Exported { file_name }
            }
            Err(err) => {
                error!("event=export module=command status=error error_code=deliver_failed error={err}");
                self.notify_export_failed();
                CommandOutcome::ExportFailed
            }
        }
    }

    fn notify_export_failed(&self) {
        self.notifier
            .notify(Notification::error("Export failed").with_detail("Could not export notes"));
    }
}

fn command_kind(command: &Command) -> &'static str {
    match command {
        Command::Theme(Theme::Dark) => "theme_dark",
        Command::Theme(Theme::Light) => "theme_light",
        Command::Help => "help",
        Command::Export => "export",
        Command::Unknown(_) => "unknown",
    }
}
