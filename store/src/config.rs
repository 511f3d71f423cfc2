//! Connection settings for the store database.
//!
//! Every field has a default, so a config file only needs the values that
//! differ from a local development server.
//!
//! # Example YAML
//!
//! ```yaml
//! host: db.internal
//! port: 3306
//! user: store_admin
//! password: hunter2
//! database: online_store
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// MySQL connection parameters.
///
/// # Examples
///
/// ```
/// # use sqlmenu_store::ConnectionConfig;
/// let config: ConnectionConfig = serde_yaml::from_str("host: db.internal\n").unwrap();
/// assert_eq!(config.host, "db.internal");
/// assert_eq!(config.port, 3306);
/// assert_eq!(config.database, "online_store");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "online_store".to_string(),
        }
    }
}

/// Values given on the command line; `Some` fields replace the loaded ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl ConnectionConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](StoreError::IoError) if the file cannot be read,
    /// [`YamlError`](StoreError::YamlError) if parsing fails, or
    /// [`InvalidConfig`](StoreError::InvalidConfig) if a required value is
    /// empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Applies command-line overrides on top of this configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(user) = overrides.user {
            self.user = user;
        }
        if let Some(password) = overrides.password {
            self.password = password;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        self
    }

    /// Checks that the values needed to connect are present.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(StoreError::InvalidConfig("host cannot be empty".to_string()));
        }
        if self.user.trim().is_empty() {
            return Err(StoreError::InvalidConfig("user cannot be empty".to_string()));
        }
        if self.database.trim().is_empty() {
            return Err(StoreError::InvalidConfig(
                "database cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(StoreError::InvalidConfig("port cannot be 0".to_string()));
        }
        Ok(())
    }

    /// `user@host:port/database`, without the password.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_local_server() {
        let config = ConnectionConfig::default();
        assert_eq!(config.display_target(), "root@localhost:3306/online_store");
        assert!(config.password.is_empty());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: ConnectionConfig =
            serde_yaml::from_str("user: clerk\npassword: s3cret\n").unwrap();
        assert_eq!(config.user, "clerk");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let config = ConnectionConfig::default().with_overrides(ConfigOverrides {
            port: Some(3307),
            database: Some("shop".to_string()),
            ..Default::default()
        });
        assert_eq!(config.port, 3307);
        assert_eq!(config.database, "shop");
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn test_validate_rejects_empty_database() {
        let config = ConnectionConfig {
            database: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StoreError::InvalidConfig(msg)) if msg.contains("database")
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.yml");
        let config = ConnectionConfig {
            host: "10.0.0.5".to_string(),
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ConnectionConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ConnectionConfig::load("/nonexistent/store.yml"),
            Err(StoreError::IoError(_))
        ));
    }
}
