//! Word-level override table
//!
//! Maps a lowercase Russian word to a lowercase Slingon word. Entries always
//! win over letter substitution. The table keeps write order: rewriting a word
//! moves it to the end, so the newest write is always last in snapshots, in the
//! persisted JSON object and when the table is inverted.

use crate::error::{SlingonError, SlingonResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pronouns the dictionary starts with when nothing has been persisted
pub const SEED_ENTRIES: &[(&str, &str)] = &[
    ("я", "би"),
    ("ты", "шах"),
    ("он", "у"),
    ("она", "у"),
    ("оно", "у"),
    ("мы", "биш"),
    ("вы", "шахар"),
    ("они", "урак"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary(IndexMap<String, String>);

impl Dictionary {
    pub fn new() -> Self {
        Dictionary(IndexMap::new())
    }

    /// The built-in pronoun set
    pub fn seed() -> Self {
        let mut dictionary = Dictionary::new();
        for (source, target) in SEED_ENTRIES {
            dictionary.insert(source, target);
        }
        dictionary
    }

    pub fn with_entry(mut self, source: &str, target: &str) -> Self {
        self.insert(source, target);
        self
    }

    /// Insert or replace an entry; both sides are stored lowercase
    ///
    /// The entry becomes the newest one even when the word was already present.
    /// Returns the previous target for the word, if any.
    pub fn insert(&mut self, source: &str, target: &str) -> Option<String> {
        let source = source.to_lowercase();
        let previous = self.0.shift_remove(&source);
        self.0.insert(source, target.to_lowercase());
        previous
    }

    /// Look up an already lowercased source word
    pub fn get(&self, source: &str) -> Option<&str> {
        self.0.get(source).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Target word to source word, the most recently written source wins on collision
    pub fn inverted(&self) -> HashMap<String, String> {
        let mut inverted = HashMap::with_capacity(self.0.len());
        for (source, target) in &self.0 {
            inverted.insert(target.to_lowercase(), source.clone());
        }
        inverted
    }

    /// All entries, oldest write first
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(source, target)| (source.clone(), target.clone()))
            .collect()
    }

    /// Serialize as a flat JSON object, keys in write order
    pub fn to_json(&self) -> String {
        // A map of strings always serializes
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse a flat JSON object of string values, keeping key order
    ///
    /// Any non-object root or non-string value rejects the whole payload.
    pub fn from_json(content: &str) -> SlingonResult<Self> {
        let persisted: Dictionary = serde_json::from_str(content)
            .map_err(|e| SlingonError::MalformedPersistedData(format!("invalid JSON: {}", e)))?;

        let mut dictionary = Dictionary::new();
        for (source, target) in &persisted.0 {
            dictionary.insert(source, target);
        }

        Ok(dictionary)
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut dictionary = Dictionary::new();
        for (source, target) in iter {
            dictionary.insert(source, target);
        }
        dictionary
    }
}
