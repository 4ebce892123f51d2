//! TOML-based application configuration.
//!
//! Stored at `~/.config/daystreak/config.toml`. Currently holds the height
//! bucketing parameters; every field carries a serde default so old config
//! files keep parsing as new fields appear.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::bucket::BLOCKS_PER_DAY;
use crate::storage::data_dir;

/// Height bucketing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Heights per day bucket (144 at a ~10-minute tick interval).
    #[serde(default = "default_blocks_per_day")]
    pub blocks_per_day: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/daystreak/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bucket: BucketConfig,
}

fn default_blocks_per_day() -> u64 {
    BLOCKS_PER_DAY
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            blocks_per_day: default_blocks_per_day(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: BucketConfig::default(),
        }
    }
}

impl Config {
    /// Path of the config file inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be prepared.
    pub fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default config on first run.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default cannot be written.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// to the field's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = &mut json;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        serde_json::Value::Number(value.parse::<u64>()?.into())
                    }
                    _ => serde_json::Value::String(value.to_string()),
                };
                obj.insert(part.to_string(), new_value);
            } else {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
            }
        }

        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }
}
