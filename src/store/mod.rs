//! Key-value persistence behind the dictionary
//!
//! The engine only needs two operations from its store: read a string by key
//! and write a string under a key. Implementations decide where the bytes go.
//!
//! # Example
//!
//! ```ignore
//! use slingon::store::{DictionaryStore, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStore::new();
//!     store.set("slingon-dictionary", r#"{"я":"би"}"#).await?;
//!     assert!(store.get("slingon-dictionary").await?.is_some());
//!     Ok(())
//! }
//! ```

pub mod file;
pub mod memory;
pub mod mock;

use crate::error::SlingonResult;
use async_trait::async_trait;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use mock::{MockStore, MockStoreMode};

/// Durable string storage used to persist the dictionary
///
/// Calls may suspend while the backend commits. A missing key is `Ok(None)`,
/// never an error.
#[async_trait]
pub trait DictionaryStore: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The stored value
    /// * `Ok(None)` - Nothing is stored under `key`
    /// * `Err(SlingonError::StoreUnavailable)` - The backend cannot be reached
    async fn get(&self, key: &str) -> SlingonResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    ///
    /// Best effort: a failed write leaves the previous value in place.
    async fn set(&self, key: &str, value: &str) -> SlingonResult<()>;

    /// Name of this store for logging
    fn store_name(&self) -> &str;
}
