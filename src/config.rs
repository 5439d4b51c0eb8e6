//! Engine configuration
//!
//! Defaults can be overridden through the environment:
//!
//! - `SLINGON_DICTIONARY_KEY` - store key holding the serialized dictionary
//! - `SLINGON_STORE_DIR` - directory for the file store

use crate::error::{SlingonError, SlingonResult};
use std::path::PathBuf;

/// Key the dictionary is persisted under unless configured otherwise
pub const DEFAULT_DICTIONARY_KEY: &str = "slingon-dictionary";

/// Directory the file store uses unless configured otherwise
pub const DEFAULT_STORE_DIR: &str = ".slingon";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub dictionary_key: String,
    pub store_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dictionary_key: DEFAULT_DICTIONARY_KEY.to_string(),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
        }
    }
}

impl EngineConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> SlingonResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// Unset variables keep their defaults; set but blank ones are an error.
    pub fn from_lookup<F>(lookup: F) -> SlingonResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("SLINGON_DICTIONARY_KEY") {
            config = config.with_dictionary_key(&key)?;
        }

        if let Some(dir) = lookup("SLINGON_STORE_DIR") {
            if dir.trim().is_empty() {
                return Err(SlingonError::ConfigError(
                    "SLINGON_STORE_DIR cannot be empty".to_string(),
                ));
            }
            config.store_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn with_dictionary_key(mut self, key: &str) -> SlingonResult<Self> {
        let key = key.trim();
        if key.is_empty() {
            return Err(SlingonError::ConfigError(
                "dictionary key cannot be empty".to_string(),
            ));
        }
        self.dictionary_key = key.to_string();
        Ok(self)
    }

    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }
}
