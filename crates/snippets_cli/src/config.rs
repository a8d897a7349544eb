//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Merge CLI flags/env values with OS-appropriate defaults.
//! - Produce absolute paths for the database and log directory.
//!
//! # Invariants
//! - Flags and `SNIPPETS_*` env values win over defaults (clap handles precedence).
//! - `log_dir` is always absolute, as required by logging bootstrap.

use crate::args::{Cli, OutputFormat};
use directories::ProjectDirs;
use snippets_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "snippets.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub output: OutputFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
    CreateDataDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot determine current directory: {err}"),
            Self::CreateDataDir { path, source } => write!(
                f,
                "failed to create database directory `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::CreateDataDir { source, .. } => Some(source),
        }
    }
}

impl AppConfig {
    /// Resolves configuration from parsed arguments and the platform data dir.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let data_dir = ProjectDirs::from("", "", "snippets")
            .map(|dirs| dirs.data_dir().to_path_buf());
        Ok(Self::resolve_with(cli, &cwd, data_dir.as_deref()))
    }

    fn resolve_with(cli: &Cli, cwd: &Path, data_dir: Option<&Path>) -> Self {
        let base_dir = data_dir.map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);

        let db_path = match &cli.db {
            Some(path) => absolutize(cwd, path),
            None => base_dir.join(DB_FILE_NAME),
        };
        let log_dir = match &cli.log_dir {
            Some(path) => absolutize(cwd, path),
            None => base_dir.join(LOG_DIR_NAME),
        };
        let log_level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());

        Self {
            db_path,
            log_dir,
            log_level,
            output: cli.output,
        }
    }

    /// Creates the database parent directory when it does not exist yet.
    pub fn ensure_db_dir(&self) -> Result<(), ConfigError> {
        let Some(parent) = self.db_path.parent() else {
            return Ok(());
        };
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDataDir {
            path: parent.to_path_buf(),
            source,
        })
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use crate::args::{Cli, Command, OutputFormat};
    use std::path::{Path, PathBuf};

    fn cli(db: Option<&str>, log_dir: Option<&str>, log_level: Option<&str>) -> Cli {
        Cli {
            command: Command::Catalog,
            db: db.map(PathBuf::from),
            log_dir: log_dir.map(PathBuf::from),
            log_level: log_level.map(str::to_string),
            output: OutputFormat::Text,
        }
    }

    #[test]
    fn defaults_live_under_the_data_dir() {
        let config = AppConfig::resolve_with(
            &cli(None, None, None),
            Path::new("/work"),
            Some(Path::new("/data/snippets")),
        );

        assert_eq!(config.db_path, Path::new("/data/snippets/snippets.sqlite3"));
        assert_eq!(config.log_dir, Path::new("/data/snippets/logs"));
        assert_eq!(config.log_level, snippets_core::default_log_level());
    }

    #[test]
    fn missing_data_dir_falls_back_to_cwd() {
        let config = AppConfig::resolve_with(&cli(None, None, None), Path::new("/work"), None);
        assert_eq!(config.db_path, Path::new("/work/snippets.sqlite3"));
    }

    #[test]
    fn relative_overrides_are_made_absolute() {
        let config = AppConfig::resolve_with(
            &cli(Some("notes.db"), Some("logs/dev"), Some("warn")),
            Path::new("/work"),
            Some(Path::new("/data/snippets")),
        );

        assert_eq!(config.db_path, Path::new("/work/notes.db"));
        assert_eq!(config.log_dir, Path::new("/work/logs/dev"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn ensure_db_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::resolve_with(
            &cli(Some("nested/deeper/snippets.db"), None, None),
            dir.path(),
            None,
        );

        config.ensure_db_dir().unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
    }
}
