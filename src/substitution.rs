//! Letter substitution codec between Russian Cyrillic and Slingon
//!
//! Every source letter maps to zero, one or two target characters. The reverse
//! table is derived by inverting the forward table in declaration order, so when
//! several source letters share a target sequence the last one declared wins.
//! Those collisions make decoding lossy for the affected letters:
//!
//! | target | source letters | decodes to |
//! |--------|----------------|------------|
//! | `й`    | ж, й           | й          |
//! | `н`    | н, р, ц        | ц          |
//! | `и`    | ы, э           | э          |
//! | `у`    | в, я           | я          |
//!
//! The same holds for the uppercase counterparts. `ъ` and `ь` are elided and
//! never come back.
//!
//! # Example
//!
//! ```
//! use slingon::SubstitutionTable;
//!
//! let table = SubstitutionTable::slingon();
//! assert_eq!(table.encode("ёлка"), "йофчә");
//! assert_eq!(table.decode("йофчә"), "ёлка");
//! ```

use std::collections::HashMap;

/// Russian to Slingon letter table. Lowercase block first, then uppercase.
pub const SLINGON_LETTERS: &[(char, &str)] = &[
    ('а', "ә"),
    ('б', "к"),
    ('в', "у"),
    ('г', "х"),
    ('д', "г"),
    ('е', "э"),
    ('ё', "йо"),
    ('ж', "й"),
    ('з', "р"),
    ('и', "ы"),
    ('й', "й"),
    ('к', "ч"),
    ('л', "ф"),
    ('м', "ц"),
    ('н', "н"),
    ('о', "ү"),
    ('п', "м"),
    ('р', "н"),
    ('с', "з"),
    ('т', "ш"),
    ('у', "о"),
    ('ф', "п"),
    ('х', "ж"),
    ('ц', "н"),
    ('ч', "т"),
    ('ш', "с"),
    ('щ', "б"),
    ('ъ', ""),
    ('ы', "и"),
    ('ь', ""),
    ('э', "и"),
    ('ю', "а"),
    ('я', "у"),
    ('А', "Ә"),
    ('Б', "К"),
    ('В', "У"),
    ('Г', "Х"),
    ('Д', "Г"),
    ('Е', "Э"),
    ('Ё', "Йо"),
    ('Ж', "Й"),
    ('З', "Р"),
    ('И', "Ы"),
    ('Й', "Й"),
    ('К', "Ч"),
    ('Л', "Ф"),
    ('М', "Ц"),
    ('Н', "Н"),
    ('О', "Ү"),
    ('П', "М"),
    ('Р', "Н"),
    ('С', "З"),
    ('Т', "Ш"),
    ('У', "О"),
    ('Ф', "П"),
    ('Х', "Ж"),
    ('Ц', "Н"),
    ('Ч', "Т"),
    ('Ш', "С"),
    ('Щ', "Б"),
    ('Ъ', ""),
    ('Ы', "И"),
    ('Ь', ""),
    ('Э', "И"),
    ('Ю', "А"),
    ('Я', "У"),
];

/// Bidirectional letter codec
///
/// Immutable once built. Characters without an entry pass through both
/// directions unchanged.
#[derive(Debug, Clone)]
pub struct SubstitutionTable {
    /// Entries in declaration order, kept for collision reporting
    entries: Vec<(char, String)>,
    forward: HashMap<char, String>,
    reverse: HashMap<String, char>,
}

impl SubstitutionTable {
    /// Build a table from `(source, target)` pairs
    ///
    /// A later pair for the same source letter replaces the earlier one. Target
    /// sequences longer than two characters are accepted but only sequences of
    /// one or two characters can be decoded.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, S)>,
        S: Into<String>,
    {
        let mut entries: Vec<(char, String)> = Vec::new();
        let mut forward = HashMap::new();

        for (source, target) in pairs {
            let target = target.into();
            entries.retain(|(existing, _)| *existing != source);
            entries.push((source, target.clone()));
            forward.insert(source, target);
        }

        let mut reverse = HashMap::new();
        for (source, target) in &entries {
            if !target.is_empty() {
                reverse.insert(target.clone(), *source);
            }
        }

        Self {
            entries,
            forward,
            reverse,
        }
    }

    /// The Russian to Slingon table
    pub fn slingon() -> Self {
        Self::new(SLINGON_LETTERS.iter().copied())
    }

    /// Mapped sequence for `c`, or `c` itself when unmapped
    pub fn encode_char(&self, c: char) -> String {
        match self.forward.get(&c) {
            Some(target) => target.clone(),
            None => c.to_string(),
        }
    }

    /// Encode a word character by character
    pub fn encode(&self, word: &str) -> String {
        let mut result = String::with_capacity(word.len());
        for c in word.chars() {
            match self.forward.get(&c) {
                Some(target) => result.push_str(target),
                None => result.push(c),
            }
        }
        result
    }

    /// Decode a target-script word, preferring two-character matches
    ///
    /// At each position a two-character sequence is tried against the reverse
    /// table before a single character. Unknown characters pass through.
    pub fn decode(&self, word: &str) -> String {
        let chars: Vec<char> = word.chars().collect();
        let mut result = String::with_capacity(word.len());
        let mut i = 0;

        while i < chars.len() {
            if i + 1 < chars.len() {
                let pair: String = chars[i..i + 2].iter().collect();
                if let Some(&source) = self.reverse.get(&pair) {
                    result.push(source);
                    i += 2;
                    continue;
                }
            }

            let single = chars[i].to_string();
            result.push(self.reverse.get(&single).copied().unwrap_or(chars[i]));
            i += 1;
        }

        result
    }

    /// Whether `c` has an entry (including elided letters)
    pub fn contains(&self, c: char) -> bool {
        self.forward.contains_key(&c)
    }

    /// Target sequences produced by more than one source letter
    ///
    /// Each item lists the competing source letters in declaration order; the
    /// last one is what `decode` yields.
    pub fn collisions(&self) -> Vec<(String, Vec<char>)> {
        let mut by_target: Vec<(String, Vec<char>)> = Vec::new();
        for (source, target) in &self.entries {
            if target.is_empty() {
                continue;
            }
            match by_target.iter_mut().find(|(t, _)| t == target) {
                Some((_, sources)) => sources.push(*source),
                None => by_target.push((target.clone(), vec![*source])),
            }
        }
        by_target.retain(|(_, sources)| sources.len() > 1);
        by_target
    }

    /// Whether `c` survives an encode/decode round trip
    pub fn is_reversible(&self, c: char) -> bool {
        match self.forward.get(&c) {
            None => !self.reverse.contains_key(&c.to_string()),
            Some(target) if target.is_empty() => false,
            Some(target) => self.reverse.get(target) == Some(&c),
        }
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::slingon()
    }
}
