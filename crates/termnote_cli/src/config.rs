//! Command-line and environment configuration.
//!
//! # Responsibility
//! - Declare CLI flags and their environment fallbacks.
//! - Resolve defaults into absolute paths before anything is opened.

use clap::Parser;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "term-notes";
const DB_FILE_NAME: &str = "notes.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Parser)]
#[command(
    name = "termnote",
    version,
    about = "Terminal note-taking console with a `:` command mode"
)]
pub struct Cli {
    /// SQLite file holding notes and settings.
    #[arg(long, env = "TERMNOTE_DB", value_name = "PATH", conflicts_with = "memory")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk.
    #[arg(long)]
    pub memory: bool,

    /// Directory receiving `:export` files.
    #[arg(long, env = "TERMNOTE_EXPORT_DIR", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TERMNOTE_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, env = "TERMNOTE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Where notes are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    Memory,
    File(PathBuf),
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub storage: StorageTarget,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    /// No platform data directory and no explicit path given.
    NoDataDir,
    /// Current directory is needed to absolutize a path but unavailable.
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "no platform data directory found; pass --db and --log-dir explicitly"
            ),
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::CurrentDir(err) => Some(err),
        }
    }
}

impl AppConfig {
    /// Resolves CLI flags against the platform data directory.
    pub fn resolve(cli: Cli, data_dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let app_dir = data_dir.map(|dir| dir.join(APP_DIR_NAME));
        let require_app_dir = || app_dir.clone().ok_or(ConfigError::NoDataDir);

        let storage = if cli.memory {
            StorageTarget::Memory
        } else {
            match cli.db {
                Some(path) => StorageTarget::File(absolutize(&cwd, path)),
                None => StorageTarget::File(require_app_dir()?.join(DB_FILE_NAME)),
            }
        };

        let log_dir = match cli.log_dir {
            Some(dir) => absolutize(&cwd, dir),
            None => require_app_dir()?.join(LOG_DIR_NAME),
        };

        let export_dir = cli
            .export_dir
            .map(|dir| absolutize(&cwd, dir))
            .unwrap_or_else(|| cwd.clone());

        let log_level = cli
            .log_level
            .unwrap_or_else(|| termnote_core::default_log_level().to_string());

        Ok(Self {
            storage,
            export_dir,
            log_level,
            log_dir,
        })
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Cli, ConfigError, StorageTarget};
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("termnote").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_live_under_data_dir() {
        let data_dir = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve(parse(&[]), Some(data_dir.path().to_path_buf())).unwrap();

        let app_dir = data_dir.path().join("term-notes");
        assert_eq!(
            config.storage,
            StorageTarget::File(app_dir.join("notes.sqlite3"))
        );
        assert_eq!(config.log_dir, app_dir.join("logs"));
        assert!(config.export_dir.is_absolute());
    }

    #[test]
    fn explicit_paths_are_absolutized() {
        let config = AppConfig::resolve(
            parse(&["--db", "my.db", "--log-dir", "logs", "--log-level", "warn"]),
            None,
        )
        .unwrap();

        match config.storage {
            StorageTarget::File(path) => {
                assert!(path.is_absolute());
                assert!(path.ends_with("my.db"));
            }
            StorageTarget::Memory => panic!("expected file storage"),
        }
        assert!(config.log_dir.is_absolute());
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn memory_mode_still_needs_a_log_dir() {
        let err = AppConfig::resolve(parse(&["--memory"]), None).unwrap_err();
        assert!(matches!(err, ConfigError::NoDataDir));

        let config =
            AppConfig::resolve(parse(&["--memory", "--log-dir", "/tmp/termnote"]), None).unwrap();
        assert_eq!(config.storage, StorageTarget::Memory);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/termnote"));
    }

    #[test]
    fn memory_conflicts_with_db() {
        let result = Cli::try_parse_from(["termnote", "--memory", "--db", "x.db"]);
        assert!(result.is_err());
    }
}
