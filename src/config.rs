//! Configuration options for differential lookup.

use crate::filter::bloom::MAX_FILTER_SIZE;
use crate::filter::FamilyKind;
use crate::record::KeyMatch;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for building a [`DifferentialLookup`](crate::lookup::DifferentialLookup).
///
/// Options can be built in code or loaded from JSON:
///
/// ```json
/// {
///   "differential_path": "differential.txt",
///   "database_path": "database.txt",
///   "expected_items": 1262147,
///   "bits_per_element": 8,
///   "family": "murmur",
///   "key_match": "case_insensitive"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupOptions {
    /// Differential file holding recently changed records.
    /// Default: "differential.txt"
    pub differential_path: PathBuf,

    /// Database file holding all records.
    /// Default: "database.txt"
    pub database_path: PathBuf,

    /// Expected number of records in the differential file.
    /// Default: 1000
    pub expected_items: usize,

    /// Filter bits per expected record.
    /// Default: 8
    pub bits_per_element: usize,

    /// Hash family backing the filter.
    /// Default: FamilyKind::Fnv
    pub family: FamilyKind,

    /// How record keys are compared against queries during scans.
    /// Default: KeyMatch::CaseInsensitive
    pub key_match: KeyMatch,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            differential_path: PathBuf::from("differential.txt"),
            database_path: PathBuf::from("database.txt"),
            expected_items: 1000,
            bits_per_element: 8,
            family: FamilyKind::Fnv,
            key_match: KeyMatch::CaseInsensitive,
        }
    }
}

impl LookupOptions {
    /// Creates options for the given differential and database files.
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(differential_path: P, database_path: Q) -> Self {
        Self {
            differential_path: differential_path.as_ref().to_path_buf(),
            database_path: database_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Loads options from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&contents)?;
        options.validate()?;
        Ok(options)
    }

    /// Sets the expected number of differential records.
    pub fn expected_items(mut self, count: usize) -> Self {
        self.expected_items = count;
        self
    }

    /// Sets the filter bits per element.
    pub fn bits_per_element(mut self, bits: usize) -> Self {
        self.bits_per_element = bits;
        self
    }

    /// Sets the hash family.
    pub fn family(mut self, family: FamilyKind) -> Self {
        self.family = family;
        self
    }

    /// Sets the key comparison mode.
    pub fn key_match(mut self, key_match: KeyMatch) -> Self {
        self.key_match = key_match;
        self
    }

    /// Validates the options and returns an error if any are invalid.
    pub fn validate(&self) -> crate::Result<()> {
        if self.expected_items == 0 {
            return Err(crate::Error::invalid_argument("expected_items must be > 0"));
        }
        if self.bits_per_element == 0 {
            return Err(crate::Error::invalid_argument("bits_per_element must be > 0"));
        }
        match self.expected_items.checked_mul(self.bits_per_element) {
            Some(bits) if bits <= MAX_FILTER_SIZE => {}
            _ => {
                return Err(crate::Error::invalid_argument(format!(
                    "expected_items * bits_per_element exceeds {} bits",
                    MAX_FILTER_SIZE
                )))
            }
        }
        Ok(())
    }
}
