//! Runtime configuration resolved by the binary. Paths default to a folder in
//! the user's home directory; every value can be overridden from the command
//! line.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
pub const DATA_DIR_NAME: &str = ".library-catalog";
/// SQLite file holding the blob store.
pub const DB_FILE_NAME: &str = "catalog.sqlite";
/// Log file written next to the database. The terminal belongs to the UI, so
/// log output never goes to stdout.
pub const LOG_FILE_NAME: &str = "catalog.log";
/// Environment variable read for the tracing filter.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// Blob store in a SQLite file.
    File(PathBuf),
    /// In-memory blob store; nothing survives the session.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageMode,
    pub log_file: PathBuf,
}

impl Config {
    /// Lay out the database and log file inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            storage: StorageMode::File(data_dir.join(DB_FILE_NAME)),
            log_file: data_dir.join(LOG_FILE_NAME),
        }
    }

    /// Resolve the configuration from optional overrides, falling back to the
    /// home-directory defaults.
    pub fn resolve(
        data_dir: Option<PathBuf>,
        db_file: Option<PathBuf>,
        log_file: Option<PathBuf>,
        ephemeral: bool,
    ) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let mut config = Self::in_dir(&data_dir);

        if ephemeral {
            config.storage = StorageMode::Ephemeral;
        } else if let Some(db_file) = db_file {
            config.storage = StorageMode::File(db_file);
        }
        if let Some(log_file) = log_file {
            config.log_file = log_file;
        }

        Ok(config)
    }
}

/// `~/.library-catalog`, resolved through the platform's home directory.
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_holds_both_files() {
        let config = Config::resolve(Some(PathBuf::from("/tmp/books")), None, None, false).unwrap();
        assert_eq!(
            config.storage,
            StorageMode::File(PathBuf::from("/tmp/books/catalog.sqlite"))
        );
        assert_eq!(config.log_file, PathBuf::from("/tmp/books/catalog.log"));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let config = Config::resolve(
            Some(PathBuf::from("/tmp/books")),
            Some(PathBuf::from("/srv/other.sqlite")),
            Some(PathBuf::from("/var/log/books.log")),
            false,
        )
        .unwrap();
        assert_eq!(
            config.storage,
            StorageMode::File(PathBuf::from("/srv/other.sqlite"))
        );
        assert_eq!(config.log_file, PathBuf::from("/var/log/books.log"));
    }

    #[test]
    fn ephemeral_ignores_db_file() {
        let config = Config::resolve(
            Some(PathBuf::from("/tmp/books")),
            Some(PathBuf::from("/srv/other.sqlite")),
            None,
            true,
        )
        .unwrap();
        assert_eq!(config.storage, StorageMode::Ephemeral);
    }
}
