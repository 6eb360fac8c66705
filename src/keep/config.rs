use crate::error::{KeepError, Result};
use crate::store::{StoreLayout, DEFAULT_FILE_EXT, DEFAULT_STORE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration for keep, stored in <base>/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeepConfig {
    /// Extension of store files (e.g. "kps"), without the dot
    #[serde(default = "default_file_ext")]
    pub file_ext: String,

    /// File stem of the store that holds notes with no group
    #[serde(default = "default_store")]
    pub default_store: String,

    /// Level for the log file: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

fn default_store() -> String {
    DEFAULT_STORE_NAME.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            file_ext: default_file_ext(),
            default_store: default_store(),
            log_level: default_log_level(),
        }
    }
}

impl KeepConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(KeepError::Io)?;
        let config: KeepConfig =
            serde_json::from_str(&content).map_err(KeepError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        // Ensure directory exists
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(KeepError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(KeepError::Serialization)?;
        fs::write(config_path, content).map_err(KeepError::Io)?;
        Ok(())
    }

    pub fn layout(&self) -> StoreLayout {
        StoreLayout::new(&self.file_ext, &self.default_store)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "file-ext" => Some(&self.file_ext),
            "default-store" => Some(&self.default_store),
            "log-level" => Some(&self.log_level),
            _ => None,
        }
    }

    /// Set a value by its command-line key, normalizing as needed
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "file-ext" => {
                let ext = value.trim_start_matches('.');
                if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                    return Err(KeepError::Malformed(format!("bad file extension '{}'", value)));
                }
                self.file_ext = ext.to_string();
            }
            "default-store" => {
                if value.is_empty() || value.starts_with('.') || value.contains(['/', '\\']) {
                    return Err(KeepError::Malformed(format!("bad store name '{}'", value)));
                }
                self.default_store = value.to_string();
            }
            "log-level" => {
                let level = value.to_ascii_lowercase();
                if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
                    return Err(KeepError::Malformed(format!(
                        "unsupported log level '{}'; expected trace|debug|info|warn|error",
                        value
                    )));
                }
                self.log_level = level;
            }
            other => {
                return Err(KeepError::Malformed(format!("unknown config key '{}'", other)));
            }
        }
        Ok(())
    }

    pub const KEYS: [&'static str; 3] = ["file-ext", "default-store", "log-level"];
}
