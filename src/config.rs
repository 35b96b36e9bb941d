use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::WellbeingError;

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistence settings
    pub storage: StorageConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Community channel settings
    pub community: CommunityConfig,
}

/// Where and how records are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the sled database
    pub path: String,
    /// Use a throwaway store that disappears on exit
    pub temporary: bool,
    /// Flush to disk after every write
    pub flush_on_write: bool,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn or error
    pub level: String,
    /// Also write logs to this file when set
    pub file_path: Option<String>,
    /// Either `text` or `json`
    pub format: String,
}

/// Community channel behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Write the welcome messages into an empty community channel
    pub seed_welcome_messages: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                path: "./data/wellbeing".to_string(),
                temporary: false,
                flush_on_write: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            community: CommunityConfig {
                seed_welcome_messages: true,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("storage.path", defaults.storage.path)?
            .set_default("storage.temporary", defaults.storage.temporary)?
            .set_default("storage.flush_on_write", defaults.storage.flush_on_write)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("community.seed_welcome_messages", defaults.community.seed_welcome_messages)?;

        if let Some(file_path) = defaults.logging.file_path {
            builder = builder.set_default("logging.file_path", file_path)?;
        }

        let config = builder
            // Add config files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("config").required(false))
            // Add environment variables with prefix, e.g. WELLBEING__STORAGE__PATH
            .add_source(Environment::with_prefix("WELLBEING").separator("__"))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.storage.temporary && self.storage.path.trim().is_empty() {
            return Err(WellbeingError::InvalidConfig(
                "storage.path must be set unless storage.temporary is true".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(WellbeingError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(WellbeingError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        Ok(())
    }

    /// Storage directory, overridable with `WELLBEING_DATA_DIR`
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        std::env::var("WELLBEING_DATA_DIR").map_or_else(|_| PathBuf::from(&self.storage.path), PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.path, "./data/wellbeing");
        assert!(config.storage.flush_on_write);
        assert_eq!(config.logging.level, "info");
        assert!(config.community.seed_welcome_messages);
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let mut config = AppConfig::default();
        config.storage.path = String::new();
        assert!(matches!(config.validate(), Err(WellbeingError::InvalidConfig(_))));

        config.storage.temporary = true;
        assert!(config.validate().is_ok());
    }
}
