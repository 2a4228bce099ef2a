//! Application configuration
//!
//! Loaded from `eshotel.toml` in the platform config directory. A missing
//! file yields the defaults; every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::accounts::PasswordScheme;
use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = "eshotel.toml";
pub const DATABASE_FILE: &str = "eshotel.db";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    pub storage: StorageConfig,
    pub accounts: AccountsConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to `<data dir>/eshotel.db`
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    pub password_scheme: PasswordScheme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            storage: StorageConfig::default(),
            accounts: AccountsConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Database location, preferring an explicit data directory override
    pub fn database_path(&self, data_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = data_dir {
            return Ok(dir.join(DATABASE_FILE));
        }
        if let Some(path) = &self.storage.path {
            return Ok(path.clone());
        }
        Ok(project_dirs()?.data_dir().join(DATABASE_FILE))
    }
}

/// Default config file location
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "onyx", "eshotel").ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine config directory",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.accounts.password_scheme, PasswordScheme::Plaintext);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            log_filter = "eshotel_core=debug"

            [storage]
            path = "/var/lib/eshotel/hotels.db"

            [accounts]
            password_scheme = "argon2"
        "#;

        let config = AppConfig::from_toml(toml).unwrap();
        assert_eq!(config.log_filter, "eshotel_core=debug");
        assert_eq!(
            config.storage.path,
            Some(PathBuf::from("/var/lib/eshotel/hotels.db"))
        );
        assert_eq!(config.accounts.password_scheme, PasswordScheme::Argon2);
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let toml = r#"
            [accounts]
            password_scheme = "md5"
        "#;
        assert!(matches!(AppConfig::from_toml(toml), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "log_filter = \"warn\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn test_database_path_precedence() {
        let config = AppConfig {
            storage: StorageConfig {
                path: Some(PathBuf::from("/srv/configured.db")),
            },
            ..AppConfig::default()
        };

        assert_eq!(
            config.database_path(Some(Path::new("/tmp/override"))).unwrap(),
            PathBuf::from("/tmp/override").join(DATABASE_FILE)
        );
        assert_eq!(
            config.database_path(None).unwrap(),
            PathBuf::from("/srv/configured.db")
        );
    }
}
