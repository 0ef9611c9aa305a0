//! Configuration management for suraksha.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::Coordinates;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "suraksha";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "reports.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "SURAKSHA_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SURAKSHA_`, nested keys joined
///    by `__`, e.g. `SURAKSHA_STORAGE__BACKEND=memory`)
/// 2. TOML config file at `~/.config/suraksha/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Device location configuration.
    pub location: LocationConfig,
}

/// Which key-value backend holds the reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `SQLite` database file on disk.
    #[default]
    Sqlite,
    /// Volatile in-process map; nothing survives the process.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend used to persist reports.
    pub backend: StorageBackend,
    /// Path to the database file.
    /// Defaults to `~/.local/share/suraksha/reports.db`
    pub database_path: Option<PathBuf>,
}

/// Fixed device position used when none is given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.database_path cannot be empty".to_string(),
                });
            }
        }

        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => {
                Coordinates::validated(latitude, longitude).map_err(|e| {
                    Error::ConfigValidation {
                        message: format!("location: {e}"),
                    }
                })?;
            }
            (None, None) => {}
            _ => {
                return Err(Error::ConfigValidation {
                    message: "location.latitude and location.longitude must be set together"
                        .to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The configured device position, if both coordinates are set.
    #[must_use]
    pub fn default_location(&self) -> Option<Coordinates> {
        match (self.location.latitude, self.location.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert!(config.storage.database_path.is_none());
        assert!(config.location.latitude.is_none());
        assert!(config.location.longitude.is_none());
    }

    #[test]
    fn test_storage_backend_display() {
        assert_eq!(StorageBackend::Sqlite.to_string(), "sqlite");
        assert_eq!(StorageBackend::Memory.to_string(), "memory");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_full_location() {
        let mut config = Config::default();
        config.location.latitude = Some(12.34);
        config.location.longitude = Some(56.78);

        assert!(config.validate().is_ok());
        assert_eq!(
            config.default_location(),
            Some(Coordinates::new(12.34, 56.78))
        );
    }

    #[test]
    fn test_validate_half_location() {
        let mut config = Config::default();
        config.location.latitude = Some(12.34);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must be set together"));
        assert!(config.default_location().is_none());
    }

    #[test]
    fn test_validate_out_of_range_location() {
        let mut config = Config::default();
        config.location.latitude = Some(120.0);
        config.location.longitude = Some(0.0);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("latitude"));
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::new());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("database_path"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("reports.db"));
        assert!(path.to_string_lossy().contains("suraksha"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("suraksha"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[storage]
backend = "memory"
database_path = "/tmp/elsewhere.db"

[location]
latitude = 27.7
longitude = 85.3
"#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.database_path(), PathBuf::from("/tmp/elsewhere.db"));
            assert_eq!(config.default_location(), Some(Coordinates::new(27.7, 85.3)));
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[location]\nlatitude = 10.0\n")?;

            let err = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[storage]
backend = "sqlite"
database_path = "/from/file.db"

[location]
latitude = 1.0
longitude = 2.0
"#,
            )?;
            jail.set_env("SURAKSHA_STORAGE__BACKEND", "memory");
            jail.set_env("SURAKSHA_STORAGE__DATABASE_PATH", "/from/env.db");
            jail.set_env("SURAKSHA_LOCATION__LATITUDE", "-33.5");

            let config = Config::load_from(Some(PathBuf::from("config.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            assert_eq!(config.database_path(), PathBuf::from("/from/env.db"));
            assert_eq!(
                config.default_location(),
                Some(Coordinates::new(-33.5, 2.0))
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_without_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SURAKSHA_LOCATION__LATITUDE", "10.0");
            jail.set_env("SURAKSHA_LOCATION__LONGITUDE", "20.0");

            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.storage.backend, StorageBackend::Sqlite);
            assert_eq!(
                config.default_location(),
                Some(Coordinates::new(10.0, 20.0))
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_half_location_rejected() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SURAKSHA_LOCATION__LONGITUDE", "20.0");

            let err = Config::load_from(Some(PathBuf::from("missing.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }));
            Ok(())
        });
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"backend": "memory"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.backend, StorageBackend::Memory);
        assert!(storage.database_path.is_none());
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"backend\":\"sqlite\""));
        assert!(json.contains("latitude"));
    }
}
