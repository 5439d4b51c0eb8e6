//! Tokenizer splitting raw text into classified fragments
//!
//! Text is first cut at sentence terminators (`.`, `!`, `?` together with any
//! whitespace after them), then each remaining segment is cut at whitespace
//! runs and the separators `,` `;` `:`. Whatever is left is classified as a
//! number, an escaped literal or a word.
//!
//! Tokens borrow from the input and concatenating their literal text gives the
//! input back exactly.
//!
//! # Example
//!
//! ```
//! use slingon::tokenizer::{Token, tokenize};
//!
//! let tokens = tokenize("я иду, *Bob*. 42");
//! assert_eq!(
//!     tokens,
//!     vec![
//!         Token::Word("я"),
//!         Token::Whitespace(" "),
//!         Token::Word("иду"),
//!         Token::Separator(","),
//!         Token::Whitespace(" "),
//!         Token::Escaped("*Bob*"),
//!         Token::Terminator(". "),
//!         Token::Number("42"),
//!     ]
//! );
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Marker wrapped around a word that must not be translated
pub const ESCAPE_MARKER: char = '*';

static TERMINATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s*").expect("terminator pattern is valid"));

static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+|[,;:]").expect("delimiter pattern is valid"));

/// A classified fragment of input text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Anything that is not a delimiter, number or escaped literal
    Word(&'a str),
    /// A run of whitespace
    Whitespace(&'a str),
    /// A single `,`, `;` or `:`
    Separator(&'a str),
    /// A single `.`, `!` or `?` with the whitespace that follows it
    Terminator(&'a str),
    /// ASCII digits only
    Number(&'a str),
    /// A word wrapped in [`ESCAPE_MARKER`], markers included
    Escaped(&'a str),
}

impl<'a> Token<'a> {
    /// The exact input text this token covers
    pub fn literal(&self) -> &'a str {
        match *self {
            Token::Word(s)
            | Token::Whitespace(s)
            | Token::Separator(s)
            | Token::Terminator(s)
            | Token::Number(s)
            | Token::Escaped(s) => s,
        }
    }

    /// Text to emit when the token is not translated
    ///
    /// Escaped tokens lose their markers; every other token is its literal.
    pub fn payload(&self) -> &'a str {
        match *self {
            Token::Escaped(s) => {
                let inner = s.strip_prefix(ESCAPE_MARKER).unwrap_or(s);
                inner.strip_suffix(ESCAPE_MARKER).unwrap_or(inner)
            }
            other => other.literal(),
        }
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Token::Word(_))
    }
}

/// Classify a segment that contains no delimiters
pub fn classify(segment: &str) -> Token<'_> {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        return Token::Number(segment);
    }

    if segment.chars().count() > 2
        && segment.starts_with(ESCAPE_MARKER)
        && segment.ends_with(ESCAPE_MARKER)
    {
        return Token::Escaped(segment);
    }

    Token::Word(segment)
}

/// Split `text` into tokens
///
/// Never fails; empty input gives an empty sequence.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in TERMINATOR_RE.find_iter(text) {
        tokenize_segment(&text[last..m.start()], &mut tokens);
        tokens.push(Token::Terminator(m.as_str()));
        last = m.end();
    }
    tokenize_segment(&text[last..], &mut tokens);

    tokens
}

fn tokenize_segment<'a>(segment: &'a str, tokens: &mut Vec<Token<'a>>) {
    let mut last = 0;

    for m in DELIMITER_RE.find_iter(segment) {
        push_piece(&segment[last..m.start()], tokens);
        let delimiter = m.as_str();
        if delimiter.chars().all(char::is_whitespace) {
            tokens.push(Token::Whitespace(delimiter));
        } else {
            tokens.push(Token::Separator(delimiter));
        }
        last = m.end();
    }
    push_piece(&segment[last..], tokens);
}

fn push_piece<'a>(piece: &'a str, tokens: &mut Vec<Token<'a>>) {
    if !piece.is_empty() {
        tokens.push(classify(piece));
    }
}

/// Concatenate the literal text of `tokens`
pub fn rejoin(tokens: &[Token<'_>]) -> String {
    tokens.iter().map(Token::literal).collect()
}
