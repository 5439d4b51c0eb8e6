//! Mock store for exercising persistence failures
//!
//! # Example
//!
//! ```ignore
//! use slingon::store::{DictionaryStore, MockStore, MockStoreMode};
//!
//! #[tokio::test]
//! async fn test_read_only() {
//!     let store = MockStore::new(MockStoreMode::ReadOnly);
//!     assert!(store.set("k", "v").await.is_err());
//! }
//! ```

use crate::error::{SlingonError, SlingonResult};
use crate::store::DictionaryStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Failure scenarios the mock can simulate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockStoreMode {
    /// Behave like an in-memory store
    Healthy,

    /// Every call fails with `StoreUnavailable`
    Unavailable,

    /// Reads succeed, writes fail with `StoreUnavailable`
    ReadOnly,

    /// Reads return the given undecodable payload, writes succeed
    Corrupt(String),
}

/// In-memory store with switchable failure modes and call counters
#[derive(Debug)]
pub struct MockStore {
    mode: Mutex<MockStoreMode>,
    values: Mutex<HashMap<String, String>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl MockStore {
    pub fn new(mode: MockStoreMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            values: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        }
    }

    /// Healthy store preloaded with `key = value`
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new(MockStoreMode::Healthy);
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Switch failure mode, e.g. to take the store down mid-test
    pub fn set_mode(&self, mode: MockStoreMode) {
        if let Ok(mut current) = self.mode.lock() {
            *current = mode;
        }
    }

    fn mode(&self) -> MockStoreMode {
        self.mode
            .lock()
            .map(|mode| mode.clone())
            .unwrap_or(MockStoreMode::Unavailable)
    }

    /// Value last written under `key`, bypassing the failure mode
    pub fn stored(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// Number of attempted writes, failed ones included
    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DictionaryStore for MockStore {
    async fn get(&self, key: &str) -> SlingonResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        match self.mode() {
            MockStoreMode::Unavailable => Err(SlingonError::StoreUnavailable(
                "mock store is down".to_string(),
            )),
            MockStoreMode::Corrupt(payload) => Ok(Some(payload)),
            MockStoreMode::Healthy | MockStoreMode::ReadOnly => Ok(self.stored(key)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> SlingonResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        match self.mode() {
            MockStoreMode::Unavailable | MockStoreMode::ReadOnly => Err(
                SlingonError::StoreUnavailable("mock store rejected write".to_string()),
            ),
            MockStoreMode::Healthy | MockStoreMode::Corrupt(_) => {
                let mut values = self.values.lock().map_err(|_| {
                    SlingonError::StoreUnavailable("mock store poisoned".to_string())
                })?;
                values.insert(key.to_string(), value.to_string());
                Ok(())
            }
        }
    }

    fn store_name(&self) -> &str {
        "Mock Store"
    }
}
