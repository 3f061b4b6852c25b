//! Scan-always retrieval, the baseline for [`DifferentialLookup`](super::DifferentialLookup).

use super::{Lookup, RecordRetriever};
use crate::config::LookupOptions;
use crate::error::Result;
use crate::record::{normalize_query, KeyMatch};
use crate::source::RecordFile;

/// Retrieval that scans the differential file on every query.
#[derive(Debug, Clone)]
pub struct NaiveLookup {
    differential: RecordFile,
    database: RecordFile,
    key_match: KeyMatch,
}

impl NaiveLookup {
    /// Creates a naive lookup over the given files.
    pub fn new(differential: RecordFile, database: RecordFile, key_match: KeyMatch) -> Self {
        Self { differential, database, key_match }
    }

    /// Creates a naive lookup over the files named in `options`.
    pub fn from_options(options: &LookupOptions) -> Self {
        Self::new(
            RecordFile::new(&options.differential_path),
            RecordFile::new(&options.database_path),
            options.key_match,
        )
    }
}

impl RecordRetriever for NaiveLookup {
    fn try_retrieve(&self, key: &str) -> Result<Lookup> {
        let query = normalize_query(key);

        if let Some(line) = self.differential.find(&query, self.key_match)? {
            return Ok(Lookup::Differential(line));
        }
        Ok(match self.database.find(&query, self.key_match)? {
            Some(line) => Lookup::Database(line),
            None => Lookup::NotFound,
        })
    }
}
