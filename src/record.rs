//! Record lines and key normalization.
//!
//! A record line holds four whitespace-separated key tokens followed by zero or
//! more `(year, n, m)` integer triples:
//!
//! ```text
//! Archbishop had given him 1720 8 6 1727 10 4
//! ```
//!
//! The identity key is the four key tokens concatenated without separator
//! (`Archbishophadgivenhim`). Everything after the key is carried verbatim.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of leading tokens that form a record's identity key.
pub const KEY_TOKENS: usize = 4;

/// How a record key is compared against a normalized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMatch {
    /// Keys match regardless of case, consistent with filter membership.
    #[default]
    CaseInsensitive,
    /// Keys must match exactly as written.
    Exact,
}

impl KeyMatch {
    /// Returns whether `record_key` answers `query`.
    pub fn matches(self, record_key: &str, query: &str) -> bool {
        match self {
            KeyMatch::CaseInsensitive => record_key
                .chars()
                .flat_map(char::to_lowercase)
                .eq(query.chars().flat_map(char::to_lowercase)),
            KeyMatch::Exact => record_key == query,
        }
    }
}

/// Lowercases `key` one character at a time.
///
/// Agrees with [`KeyMatch::CaseInsensitive`] on every input. `str::to_lowercase`
/// does not: its final-sigma rule depends on the surrounding characters.
pub fn fold_case(key: &str) -> String {
    key.chars().flat_map(char::to_lowercase).collect()
}

/// Strips all whitespace from a query key.
pub fn normalize_query(key: &str) -> String {
    key.split_whitespace().collect()
}

/// A parsed record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: String,
    line: String,
}

impl Record {
    /// Parses a record line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] with line number 0 if the line has fewer
    /// than four tokens.
    pub fn parse(line: impl Into<String>) -> Result<Self> {
        let line = line.into();
        let key = identity_key(&line).ok_or_else(|| Error::malformed(0, token_count(&line)))?;
        Ok(Self { key, line })
    }

    /// The concatenated identity key, case preserved.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full record line.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Consumes the record, returning the full line.
    pub fn into_line(self) -> String {
        self.line
    }
}

/// Concatenation of the first four tokens of `line`, or `None` if it has fewer.
pub fn identity_key(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    let mut key = String::new();
    for _ in 0..KEY_TOKENS {
        key.push_str(tokens.next()?);
    }
    Some(key)
}

fn token_count(line: &str) -> usize {
    line.split_whitespace().count()
}
