//! Configuration Module
//! File locations for the desktop apps and dashboard server settings.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DATA_FILE: &str = "expenses.csv";
pub const BACKUP_DIR: &str = "backups";
pub const CONFIG_FILE: &str = "config.json";
pub const TRACKER_LOG: &str = "tracker_log.txt";
pub const CLEANER_LOG: &str = "cleaner_log.txt";
pub const DASHBOARD_LOG: &str = "dashboard_log.txt";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not locate the application directory: {0}")]
    NoAppDir(io::Error),
    #[error("Could not access config file: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid config file: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Where an app keeps its files. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub base_dir: PathBuf,
    pub data_file: PathBuf,
    pub log_file: PathBuf,
    pub backup_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Paths inside `base_dir`, with the given log file name.
    pub fn in_dir(base_dir: impl Into<PathBuf>, log_name: &str) -> Self {
        let base_dir = base_dir.into();
        Self {
            data_file: base_dir.join(DATA_FILE),
            log_file: base_dir.join(log_name),
            backup_dir: base_dir.join(BACKUP_DIR),
            config_file: base_dir.join(CONFIG_FILE),
            base_dir,
        }
    }

    /// Paths next to the running executable.
    pub fn beside_executable(log_name: &str) -> Result<Self, ConfigError> {
        let exe = std::env::current_exe().map_err(ConfigError::NoAppDir)?;
        let dir = exe.parent().ok_or_else(|| {
            ConfigError::NoAppDir(io::Error::new(
                io::ErrorKind::NotFound,
                "executable has no parent directory",
            ))
        })?;
        Ok(Self::in_dir(dir, log_name))
    }

    /// `--data-dir` when given, otherwise beside the executable.
    pub fn resolve(data_dir: Option<&Path>, log_name: &str) -> Result<Self, ConfigError> {
        match data_dir {
            Some(dir) => Ok(Self::in_dir(dir, log_name)),
            None => Self::beside_executable(log_name),
        }
    }
}

/// Dashboard bind address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub host: String,
    pub port: u16,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

impl DashboardSettings {
    pub fn addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_in_dir() {
        let paths = AppPaths::in_dir("/tmp/app", TRACKER_LOG);
        assert_eq!(paths.data_file, PathBuf::from("/tmp/app/expenses.csv"));
        assert_eq!(paths.log_file, PathBuf::from("/tmp/app/tracker_log.txt"));
        assert_eq!(paths.backup_dir, PathBuf::from("/tmp/app/backups"));
        assert_eq!(paths.config_file, PathBuf::from("/tmp/app/config.json"));
    }

    #[test]
    fn test_resolve_prefers_data_dir() {
        let paths = AppPaths::resolve(Some(Path::new("/data")), CLEANER_LOG).unwrap();
        assert_eq!(paths.base_dir, PathBuf::from("/data"));
        assert!(AppPaths::resolve(None, CLEANER_LOG).is_ok());
    }

    #[test]
    fn test_dashboard_defaults() {
        let settings = DashboardSettings::default();
        assert_eq!(settings.addr(), ("127.0.0.1".to_string(), 8050));
    }
}
