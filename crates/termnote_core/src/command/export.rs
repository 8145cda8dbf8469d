//! Export delivery for the `export` command.
//!
//! # Responsibility
//! - Name export files by date.
//! - Deliver the verbatim persisted payload to a destination.

use chrono::NaiveDate;
use log::info;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    /// File name would escape the export destination.
    InvalidFileName(String),
    /// Writing the file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFileName(name) => write!(f, "invalid export file name: `{name}`"),
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFileName(_) => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Destination for exported note payloads.
pub trait Exporter {
    /// Delivers `payload` under `file_name`.
    fn deliver(&self, file_name: &str, payload: &str) -> ExportResult<()>;
}

/// Returns `term-notes-<YYYY-MM-DD>.json` for `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("term-notes-{}.json", date.format("%Y-%m-%d"))
}

/// Writes export files into an existing directory.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn target_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Exporter for DirectoryExporter {
    fn deliver(&self, file_name: &str, payload: &str) -> ExportResult<()> {
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(ExportError::InvalidFileName(file_name.to_string()));
        }

        let path = self.target_path(file_name);
        std::fs::write(&path, payload).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=export_write module=command status=ok path={} bytes={}",
            path.display(),
            payload.len()
        );
        Ok(())
    }
}

/// Keeps delivered exports in memory.
#[derive(Debug, Default)]
pub struct RecordingExporter {
    deliveries: RefCell<Vec<(String, String)>>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered `(file_name, payload)` pairs in order.
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.borrow().clone()
    }
}

impl Exporter for RecordingExporter {
    fn deliver(&self, file_name: &str, payload: &str) -> ExportResult<()> {
        self.deliveries
            .borrow_mut()
            .push((file_name.to_string(), payload.to_string()));
        Ok(())
    }
}

impl<T: Exporter + ?Sized> Exporter for std::rc::Rc<T> {
    fn deliver(&self, file_name: &str, payload: &str) -> ExportResult<()> {
        (**self).deliver(file_name, payload)
    }
}
