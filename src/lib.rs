//! Deterministic, reversible transliteration between Russian and Slingon
//!
//! The pipeline is tokenizer, then dictionary lookup, then letter
//! substitution. Forward translation learns every word it had to substitute
//! and persists the dictionary through a [`DictionaryStore`].

pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod store;
pub mod substitution;
pub mod tokenizer;


// Re-export the main types for convenient access
pub use config::EngineConfig;
pub use dictionary::Dictionary;
pub use engine::{Direction, Translation, TranslationEngine};
pub use error::{SlingonError, SlingonResult};
pub use store::{DictionaryStore, FileStore, MemoryStore, MockStore, MockStoreMode};
pub use substitution::SubstitutionTable;
pub use tokenizer::{Token, tokenize};
