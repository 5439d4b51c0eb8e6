//! Process-local store, lost on exit

use crate::error::{SlingonError, SlingonResult};
use crate::store::DictionaryStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `key = value`
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl DictionaryStore for MemoryStore {
    async fn get(&self, key: &str) -> SlingonResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| SlingonError::StoreUnavailable("memory store poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SlingonResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SlingonError::StoreUnavailable("memory store poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn store_name(&self) -> &str {
        "Memory Store"
    }
}
