//! Translation engine
//!
//! Forward translation looks every word up in the dictionary first and falls
//! back to letter substitution, recording each fallback result in the
//! dictionary and persisting it straight away. Reverse translation reads an
//! inverted view of the dictionary and otherwise decodes letter by letter; it
//! never writes.
//!
//! # Example
//!
//! ```ignore
//! use slingon::{Direction, EngineConfig, MemoryStore, TranslationEngine};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryStore::new());
//!     let engine = TranslationEngine::load(store, EngineConfig::default()).await;
//!     let result = engine.translate("Я иду домой.", Direction::Forward).await;
//!     assert_eq!(result.text, "Би ыго гүцүй.");
//! }
//! ```

use crate::config::EngineConfig;
use crate::dictionary::Dictionary;
use crate::error::{SlingonError, SlingonResult};
use crate::store::DictionaryStore;
use crate::substitution::SubstitutionTable;
use crate::tokenizer::{Token, tokenize};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Translation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Russian to Slingon
    Forward,
    /// Slingon to Russian
    Reverse,
}

impl Direction {
    pub fn swap(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Short code as used by the frontends
    pub fn code(self) -> &'static str {
        match self {
            Direction::Forward => "ru-sl",
            Direction::Reverse => "sl-ru",
        }
    }
}

impl FromStr for Direction {
    type Err = SlingonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru-sl" | "forward" => Ok(Direction::Forward),
            "sl-ru" | "reverse" => Ok(Direction::Reverse),
            other => Err(SlingonError::ConfigError(format!(
                "unknown direction '{}', expected ru-sl or sl-ru",
                other
            ))),
        }
    }
}

/// Outcome of a single `translate` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    /// The translated text
    pub text: String,
    /// Words learned into the dictionary during this call, in order
    pub learned: Vec<(String, String)>,
    /// Persistence failures hit while saving learned words
    pub warnings: Vec<SlingonError>,
}

/// Whether `word` starts with an uppercase Russian letter
pub fn starts_with_source_uppercase(word: &str) -> bool {
    matches!(word.chars().next(), Some('А'..='Я' | 'Ё'))
}

/// Whether `word` starts with an uppercase Slingon letter
///
/// Slingon adds `Ә` and `Ү` to the Russian uppercase range; `І` is accepted
/// as well although the letter table never produces it.
pub fn starts_with_target_uppercase(word: &str) -> bool {
    matches!(word.chars().next(), Some('А'..='Я' | 'Ё' | 'Ә' | 'Ү' | 'І'))
}

/// Uppercase the first character of `word`, leaving the rest as is
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct TranslationEngine {
    table: SubstitutionTable,
    dictionary: Mutex<Dictionary>,
    store: Arc<dyn DictionaryStore>,
    config: EngineConfig,
}

impl TranslationEngine {
    /// Create an engine, loading the dictionary from `store`
    ///
    /// Falls back to the seed dictionary when nothing is stored, the stored
    /// value cannot be decoded, or the store is unreachable. Only the first
    /// case writes the seed back.
    pub async fn load(store: Arc<dyn DictionaryStore>, config: EngineConfig) -> Self {
        let key = config.dictionary_key.as_str();

        let dictionary = match store.get(key).await {
            Ok(Some(content)) => match Dictionary::from_json(&content) {
                Ok(dictionary) => {
                    debug!(
                        "Loaded {} dictionary entries from {}",
                        dictionary.len(),
                        store.store_name()
                    );
                    dictionary
                }
                Err(e) => {
                    warn!("Ignoring persisted dictionary, using seed: {}", e);
                    Dictionary::seed()
                }
            },
            Ok(None) => {
                let seed = Dictionary::seed();
                debug!("No persisted dictionary under '{}', writing seed", key);
                if let Err(e) = store.set(key, &seed.to_json()).await {
                    warn!("Failed to persist seed dictionary: {}", e);
                }
                seed
            }
            Err(e) => {
                warn!("Dictionary store unreachable, using seed: {}", e);
                Dictionary::seed()
            }
        };

        Self::with_dictionary(store, config, dictionary)
    }

    /// Create an engine around an already loaded dictionary
    pub fn with_dictionary(
        store: Arc<dyn DictionaryStore>,
        config: EngineConfig,
        dictionary: Dictionary,
    ) -> Self {
        Self {
            table: SubstitutionTable::slingon(),
            dictionary: Mutex::new(dictionary),
            store,
            config,
        }
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Translate `text` in the given direction
    ///
    /// Never fails. Persistence problems are reported in
    /// [`Translation::warnings`] and the in-memory dictionary keeps the
    /// learned words regardless.
    pub async fn translate(&self, text: &str, direction: Direction) -> Translation {
        match direction {
            Direction::Forward => self.translate_forward(text).await,
            Direction::Reverse => self.translate_reverse(text).await,
        }
    }

    /// Russian to Slingon, learning unseen words
    pub async fn translate_forward(&self, text: &str) -> Translation {
        let mut translation = Translation::default();
        // Held for the whole call so concurrent forward translations cannot
        // interleave their learn-and-persist steps.
        let mut dictionary = self.dictionary.lock().await;

        for token in tokenize(text) {
            let word = match token {
                Token::Word(word) => word,
                other => {
                    translation.text.push_str(other.payload());
                    continue;
                }
            };

            let lower = word.to_lowercase();
            let candidate = match dictionary.get(&lower) {
                Some(known) => known.to_string(),
                None => {
                    let encoded = self.table.encode(word);
                    dictionary.insert(&lower, &encoded);
                    debug!("Learned '{}' -> '{}'", lower, encoded.to_lowercase());
                    translation
                        .learned
                        .push((lower.clone(), encoded.to_lowercase()));

                    if let Err(e) = self.persist(&dictionary).await {
                        warn!("Failed to persist learned word '{}': {}", lower, e);
                        translation.warnings.push(e);
                    }
                    encoded
                }
            };

            if starts_with_source_uppercase(word) {
                translation.text.push_str(&capitalize_first(&candidate));
            } else {
                translation.text.push_str(&candidate);
            }
        }

        translation
    }

    /// Slingon to Russian; read-only
    pub async fn translate_reverse(&self, text: &str) -> Translation {
        let inverted = self.dictionary.lock().await.inverted();
        let mut translation = Translation::default();

        for token in tokenize(text) {
            let word = match token {
                Token::Word(word) => word,
                other => {
                    translation.text.push_str(other.payload());
                    continue;
                }
            };

            match inverted.get(&word.to_lowercase()) {
                Some(source) if starts_with_target_uppercase(word) => {
                    translation.text.push_str(&capitalize_first(source));
                }
                Some(source) => translation.text.push_str(source),
                None => translation.text.push_str(&self.table.decode(word)),
            }
        }

        translation
    }

    /// Add or replace a dictionary entry by hand
    ///
    /// Both words are trimmed and lowercased. An empty target, or a source that
    /// does not tokenize to exactly one word, is rejected before anything
    /// changes. When the store refuses the write the entry still
    /// stays in memory and `StoreUnavailable` is returned.
    pub async fn add_manual_entry(&self, source: &str, target: &str) -> SlingonResult<()> {
        let source = source.trim();
        let target = target.trim();

        if source.is_empty() {
            return Err(SlingonError::InvalidManualEntry(
                "source word is empty".to_string(),
            ));
        }
        if !matches!(tokenize(source).as_slice(), [token] if token.is_word()) {
            return Err(SlingonError::InvalidManualEntry(format!(
                "source '{}' must be a single word",
                source
            )));
        }
        if target.is_empty() {
            return Err(SlingonError::InvalidManualEntry(
                "target word is empty".to_string(),
            ));
        }

        let mut dictionary = self.dictionary.lock().await;
        dictionary.insert(source, target);
        debug!("Manual entry '{}' -> '{}'", source, target);

        self.persist(&dictionary).await.inspect_err(|e| {
            warn!("Failed to persist manual entry '{}': {}", source, e);
        })
    }

    /// Current dictionary entries, oldest write first
    pub async fn dictionary_snapshot(&self) -> Vec<(String, String)> {
        self.dictionary.lock().await.snapshot()
    }

    async fn persist(&self, dictionary: &Dictionary) -> SlingonResult<()> {
        self.store
            .set(&self.config.dictionary_key, &dictionary.to_json())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockStore, MockStoreMode};

    fn engine_with(dictionary: Dictionary) -> (TranslationEngine, Arc<MockStore>) {
        let store = Arc::new(MockStore::new(MockStoreMode::Healthy));
        let engine =
            TranslationEngine::with_dictionary(store.clone(), EngineConfig::default(), dictionary);
        (engine, store)
    }

    // ========== Direction Tests ==========

    #[test]
    fn test_direction_parse_and_swap() {
        assert_eq!("ru-sl".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("SL-RU".parse::<Direction>().unwrap(), Direction::Reverse);
        assert_eq!("reverse".parse::<Direction>().unwrap(), Direction::Reverse);
        assert!("en-fr".parse::<Direction>().is_err());

        assert_eq!(Direction::Forward.swap(), Direction::Reverse);
        assert_eq!(Direction::Reverse.swap().code(), "ru-sl");
    }

    // ========== Case Helper Tests ==========

    #[test]
    fn test_uppercase_detection() {
        assert!(starts_with_source_uppercase("Привет"));
        assert!(starts_with_source_uppercase("Ёж"));
        assert!(!starts_with_source_uppercase("привет"));
        assert!(!starts_with_source_uppercase("Hello"));
        assert!(!starts_with_source_uppercase(""));

        assert!(starts_with_target_uppercase("Әщ"));
        assert!(starts_with_target_uppercase("Үү"));
        assert!(!starts_with_source_uppercase("Әщ"));
    }

    #[test]
    fn test_target_uppercase_covers_table_output() {
        let table = SubstitutionTable::slingon();
        for c in "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЫЭЮЯ".chars() {
            let encoded = table.encode_char(c);
            assert!(
                starts_with_target_uppercase(&encoded),
                "{} encodes to {}",
                c,
                encoded
            );
        }
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("би"), "Би");
        assert_eq!(capitalize_first("әк"), "Әк");
        assert_eq!(capitalize_first(""), "");
    }

    // ========== Forward Tests ==========

    #[tokio::test]
    async fn test_forward_example_sentence() {
        let (engine, _) = engine_with(Dictionary::new().with_entry("я", "би"));
        let result = engine.translate("я иду домой.", Direction::Forward).await;
        assert_eq!(result.text, "би ыго гүцүй.");
    }

    #[tokio::test]
    async fn test_forward_dictionary_wins_over_table() {
        let (engine, _) = engine_with(Dictionary::new().with_entry("кот", "мяу"));
        let result = engine.translate_forward("кот Кот").await;
        assert_eq!(result.text, "мяу Мяу");
        assert!(result.learned.is_empty());
    }

    #[tokio::test]
    async fn test_forward_learns_lowercase_encoding() {
        let (engine, store) = engine_with(Dictionary::new());
        let result = engine.translate_forward("Привет").await;

        assert_eq!(result.text, "Мныуэш");
        assert_eq!(
            result.learned,
            vec![("привет".to_string(), "мныуэш".to_string())]
        );

        let snapshot = engine.dictionary_snapshot().await;
        assert_eq!(
            snapshot,
            vec![("привет".to_string(), "мныуэш".to_string())]
        );

        let persisted = store.stored("slingon-dictionary").unwrap();
        assert_eq!(
            Dictionary::from_json(&persisted).unwrap().get("привет"),
            Some("мныуэш")
        );
    }

    #[tokio::test]
    async fn test_forward_learns_each_word_once() {
        let (engine, store) = engine_with(Dictionary::new());
        let result = engine.translate_forward("дом дом ДОМ").await;

        assert_eq!(result.text, "гүц гүц Гүц");
        assert_eq!(result.learned.len(), 1);
        assert_eq!(store.set_calls(), 1);
    }

    #[tokio::test]
    async fn test_forward_passes_non_words_through() {
        let (engine, store) = engine_with(Dictionary::new());
        let result = engine.translate_forward("42, 7; *Москва*!  ").await;

        assert_eq!(result.text, "42, 7; Москва!  ");
        assert!(result.learned.is_empty());
        assert_eq!(store.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_forward_escaped_word_is_not_learned() {
        let (engine, _) = engine_with(Dictionary::new());
        let result = engine.translate_forward("*hello* мир").await;

        assert_eq!(result.text, "hello цын");
        let sources: Vec<String> = engine
            .dictionary_snapshot()
            .await
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        assert_eq!(sources, vec!["мир"]);
    }

    #[tokio::test]
    async fn test_forward_empty_input() {
        let (engine, store) = engine_with(Dictionary::seed());
        assert_eq!(engine.translate_forward("").await.text, "");
        assert_eq!(engine.translate_forward("  \n").await.text, "  \n");
        assert_eq!(store.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_forward_persistence_failure_is_a_warning() {
        let store = Arc::new(MockStore::new(MockStoreMode::ReadOnly));
        let engine = TranslationEngine::with_dictionary(
            store.clone(),
            EngineConfig::default(),
            Dictionary::new(),
        );

        let result = engine.translate_forward("лес и поле").await;

        assert_eq!(result.text, "фэз ы мүфэ");
        assert_eq!(result.learned.len(), 3);
        assert_eq!(result.warnings.len(), 3);
        assert!(matches!(
            result.warnings[0],
            SlingonError::StoreUnavailable(_)
        ));
        // Learned words stay in memory
        assert_eq!(engine.dictionary_snapshot().await.len(), 3);
    }

    // ========== Reverse Tests ==========

    #[tokio::test]
    async fn test_reverse_uses_inverted_dictionary() {
        let (engine, _) = engine_with(Dictionary::seed());
        let result = engine.translate("Би шах, у.", Direction::Reverse).await;
        assert_eq!(result.text, "Я ты, оно.");
    }

    #[tokio::test]
    async fn test_reverse_decodes_unknown_words() {
        let (engine, _) = engine_with(Dictionary::new());
        let result = engine.translate_reverse("Йофчә ыго").await;
        assert_eq!(result.text, "Ёлка иду");
    }

    #[tokio::test]
    async fn test_reverse_capitalizes_slingon_specific_letters() {
        let (engine, _) = engine_with(Dictionary::new().with_entry("арбуз", "әнкор"));
        let result = engine.translate_reverse("Әнкор әнкор").await;
        assert_eq!(result.text, "Арбуз арбуз");
    }

    #[tokio::test]
    async fn test_reverse_never_writes() {
        let (engine, store) = engine_with(Dictionary::new());
        let result = engine.translate_reverse("неизвестное слово").await;

        assert!(result.learned.is_empty());
        assert!(engine.dictionary_snapshot().await.is_empty());
        assert_eq!(store.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_reverse_passes_escaped_and_numbers() {
        let (engine, _) = engine_with(Dictionary::seed());
        let result = engine.translate_reverse("*би* 42").await;
        assert_eq!(result.text, "би 42");
    }

    // ========== Manual Entry Tests ==========

    #[tokio::test]
    async fn test_manual_entry_is_stored_lowercase() {
        let (engine, store) = engine_with(Dictionary::new());
        engine.add_manual_entry(" Кошка ", "МУРКА").await.unwrap();

        assert_eq!(
            engine.dictionary_snapshot().await,
            vec![("кошка".to_string(), "мурка".to_string())]
        );
        assert_eq!(store.set_calls(), 1);
        assert_eq!(engine.translate_forward("Кошка").await.text, "Мурка");
    }

    #[tokio::test]
    async fn test_manual_entry_rejects_empty_words() {
        let (engine, store) = engine_with(Dictionary::new());

        assert!(matches!(
            engine.add_manual_entry("", "би").await,
            Err(SlingonError::InvalidManualEntry(_))
        ));
        assert!(matches!(
            engine.add_manual_entry("я", "   ").await,
            Err(SlingonError::InvalidManualEntry(_))
        ));
        assert!(engine.dictionary_snapshot().await.is_empty());
        assert_eq!(store.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_manual_entry_rejects_multi_word_source() {
        let (engine, store) = engine_with(Dictionary::new());

        for source in ["два слова", "кот,", "да!", "а;б", "42", "*раз*"] {
            assert!(
                matches!(
                    engine.add_manual_entry(source, "x").await,
                    Err(SlingonError::InvalidManualEntry(_))
                ),
                "source: {:?}",
                source
            );
        }
        assert!(engine.dictionary_snapshot().await.is_empty());
        assert_eq!(store.set_calls(), 0);

        // Surrounding whitespace is trimmed, not rejected
        engine.add_manual_entry("  кот ", "мяу").await.unwrap();
        assert_eq!(
            engine.dictionary_snapshot().await,
            vec![("кот".to_string(), "мяу".to_string())]
        );
    }

    #[tokio::test]
    async fn test_manual_entry_wins_reverse_collision() {
        let (engine, store) = engine_with(Dictionary::seed());

        engine.add_manual_entry("ага", "би").await.unwrap();

        assert_eq!(engine.translate_reverse("би").await.text, "ага");
        assert_eq!(engine.translate_reverse("Би!").await.text, "Ага!");
        let snapshot = engine.dictionary_snapshot().await;
        assert_eq!(snapshot[0], ("я".to_string(), "би".to_string()));
        assert_eq!(snapshot.last(), Some(&("ага".to_string(), "би".to_string())));

        let persisted = store.stored("slingon-dictionary").unwrap();
        assert!(persisted.starts_with(r#"{"я":"би""#));
        assert!(persisted.ends_with(r#""ага":"би"}"#));
    }

    #[tokio::test]
    async fn test_manual_entry_survives_store_failure() {
        let store = Arc::new(MockStore::new(MockStoreMode::Unavailable));
        let engine =
            TranslationEngine::with_dictionary(store, EngineConfig::default(), Dictionary::new());

        let result = engine.add_manual_entry("я", "би").await;
        assert!(matches!(result, Err(SlingonError::StoreUnavailable(_))));
        assert_eq!(engine.dictionary_snapshot().await.len(), 1);
    }

    // ========== Load Tests ==========

    #[tokio::test]
    async fn test_load_seeds_and_persists_when_absent() {
        let store = Arc::new(MockStore::new(MockStoreMode::Healthy));
        let engine = TranslationEngine::load(store.clone(), EngineConfig::default()).await;

        assert_eq!(engine.dictionary_snapshot().await, Dictionary::seed().snapshot());
        assert_eq!(store.set_calls(), 1);
        assert!(store.stored("slingon-dictionary").is_some());
    }

    #[tokio::test]
    async fn test_load_reads_persisted_dictionary() {
        let store = Arc::new(MemoryStore::with_value(
            "slingon-dictionary",
            r#"{"дом":"хата"}"#,
        ));
        let engine = TranslationEngine::load(store, EngineConfig::default()).await;

        assert_eq!(
            engine.dictionary_snapshot().await,
            vec![("дом".to_string(), "хата".to_string())]
        );
    }

    #[tokio::test]
    async fn test_load_uses_configured_key() {
        let store = Arc::new(MemoryStore::with_value("other", r#"{"дом":"хата"}"#));
        let config = EngineConfig::default().with_dictionary_key("other").unwrap();
        let engine = TranslationEngine::load(store, config).await;

        assert_eq!(engine.translate_forward("дом").await.text, "хата");
    }

    #[tokio::test]
    async fn test_load_malformed_falls_back_without_writing() {
        let store = Arc::new(MockStore::new(MockStoreMode::Corrupt(
            "{not json".to_string(),
        )));
        let engine = TranslationEngine::load(store.clone(), EngineConfig::default()).await;

        assert_eq!(engine.dictionary_snapshot().await, Dictionary::seed().snapshot());
        assert_eq!(store.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_load_unreachable_store_falls_back() {
        let store = Arc::new(MockStore::new(MockStoreMode::Unavailable));
        let engine = TranslationEngine::load(store.clone(), EngineConfig::default()).await;

        assert_eq!(engine.dictionary_snapshot().await.len(), 8);
        assert_eq!(store.set_calls(), 0);
    }
}
