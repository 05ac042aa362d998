use crate::types::Config;
use snipdeck_core::PageScope;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during config management
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Manager for the dashboard configuration
///
/// Owns the config file at ~/.snipdeck/config.toml: loading, atomic
/// saving, and the key-by-key edits behind `snipdeck config set`.
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Get the default config path (~/.snipdeck/config.toml)
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".snipdeck").join("config.toml"))
    }

    /// Get the default publish root (~/.snipdeck/publish)
    pub fn default_publish_root() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".snipdeck").join("publish"))
    }

    /// Load config from the default location, failing if it is missing
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from a specific path, failing if it is missing
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        let config: Config = toml::from_str(&contents)?;

        Ok(Self {
            config_path: path.to_path_buf(),
            config,
        })
    }

    /// Load from the default location, or start from defaults when no
    /// config file exists yet. A corrupt file is still an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::load_or_default_from(&config_path)
    }

    /// Load from a specific path, or start from defaults when missing
    pub fn load_or_default_from(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Ok(manager) => Ok(manager),
            Err(ConfigError::ConfigNotFound(_)) => Ok(Self {
                config_path: path.to_path_buf(),
                config: Config::default(),
            }),
            Err(err) => Err(err),
        }
    }

    /// Initialize a new config file at the default location
    pub fn init() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;
        Self::init_at(&config_path)
    }

    /// Initialize a config file with defaults at a specific path
    pub fn init_at(path: &Path) -> Result<Self, ConfigError> {
        let manager = Self {
            config_path: path.to_path_buf(),
            config: Config::default(),
        };
        manager.save()?;
        Ok(manager)
    }

    /// Save config to disk atomically
    ///
    /// Uses a temporary file and atomic rename to prevent corruption
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(&self.config)?;
        let temp_path = self.config_path.with_extension("toml.tmp");
        fs::write(&temp_path, toml_str)?;
        fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }

    /// Get reference to config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable reference to config (caller must call save())
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Path of the backing config file
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Set one config key from its string form and save.
    ///
    /// Page overrides use dotted keys: `page_priorities.checkout`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if let Some(page_name) = key.strip_prefix("page_priorities.") {
            let page = PageScope::from_cli_name(page_name).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: format!("unknown page {page_name:?}"),
                }
            })?;
            let priority = parse_u8(key, value)?;
            self.config
                .page_priorities
                .insert(page.cli_name().to_string(), priority);
            return self.save();
        }

        match key {
            "base_url" => self.config.base_url = value.to_string(),
            "publish_root" => self.config.publish_root = Some(PathBuf::from(value)),
            "store_path" => self.config.store_path = Some(PathBuf::from(value)),
            "deploy_delay_ms" => self.config.deploy_delay_ms = parse_u64(key, value)?,
            "publish_timeout_secs" => self.config.publish_timeout_secs = parse_u64(key, value)?,
            "watch_interval_secs" => self.config.watch_interval_secs = parse_u64(key, value)?,
            "auto_minify" => self.config.auto_minify = parse_bool(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        self.save()
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a whole number".to_string(),
    })
}

fn parse_u8(key: &str, value: &str) -> Result<u8, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected a number between 0 and 255".to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "expected true or false".to_string(),
    })
}
