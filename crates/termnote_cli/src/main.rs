//! `termnote` console entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open storage.
//! - Run the interactive console on stdin/stdout.

mod config;
mod console;

use clap::Parser;
use config::{AppConfig, Cli, StorageTarget};
use log::{info, warn};
use std::process::ExitCode;
use std::rc::Rc;
use termnote_core::{
    init_logging, DirectoryExporter, KeyValueStore, MemoryStore, NotificationLog, Notifier,
    Session, SqliteStore, SystemClock,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::resolve(cli, dirs::data_dir()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("termnote: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is best-effort: the console stays usable without a log file.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("termnote: logging disabled: {err}");
    }

    let storage = match open_storage(&config.storage) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("termnote: {err}");
            return ExitCode::FAILURE;
        }
    };

    let notifications = Rc::new(NotificationLog::new());
    let notifier: Rc<dyn Notifier> = notifications.clone();
    let mut session = Session::open(
        storage,
        Box::new(DirectoryExporter::new(&config.export_dir)),
        notifier,
        Rc::new(SystemClock),
    );
    info!(
        "event=session_open module=cli status=ok notes={} export_dir={}",
        session.notes().len(),
        config.export_dir.display()
    );

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match console::run(&mut session, &notifications, stdin.lock(), &mut stdout) {
        Ok(()) => {
            info!("event=session_close module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            warn!("event=session_close module=cli status=error error={err}");
            eprintln!("termnote: {err}");
            ExitCode::FAILURE
        }
    }
}

fn open_storage(target: &StorageTarget) -> Result<Box<dyn KeyValueStore>, String> {
    match target {
        StorageTarget::Memory => Ok(Box::new(MemoryStore::new())),
        StorageTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    format!("cannot create data directory `{}`: {err}", parent.display())
                })?;
            }
            let store = SqliteStore::open(path)
                .map_err(|err| format!("cannot open `{}`: {err}", path.display()))?;
            Ok(Box::new(store))
        }
    }
}
