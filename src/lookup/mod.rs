//! Two-tier record retrieval.
//!
//! A query is answered from the differential file if it holds the key, else from
//! the database file, else [`Lookup::NotFound`]. Two retrievers implement this:
//!
//! - [`DifferentialLookup`] consults a [`BloomFilter`](crate::filter::BloomFilter)
//!   built over the differential file and skips the differential scan when the
//!   key is provably absent
//! - [`NaiveLookup`] always scans the differential file first; it is the
//!   reference the filtered path must agree with

mod differential;
mod naive;
mod stats;

pub use differential::{build_filter, build_filter_with_rng, DifferentialLookup};
pub use naive::NaiveLookup;
pub use stats::{LookupStats, StatsSnapshot};

use crate::error::Result;
use std::fmt;

/// Which tier answered a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The differential file.
    Differential,
    /// The database file.
    Database,
}

/// Outcome of a record retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The differential file holds the key; its line shadows the database.
    Differential(String),
    /// Only the database file holds the key.
    Database(String),
    /// Neither file holds the key.
    NotFound,
}

impl Lookup {
    /// The matching record line, if any.
    pub fn line(&self) -> Option<&str> {
        match self {
            Lookup::Differential(line) | Lookup::Database(line) => Some(line),
            Lookup::NotFound => None,
        }
    }

    /// Consumes the outcome, returning the matching record line.
    pub fn into_line(self) -> Option<String> {
        match self {
            Lookup::Differential(line) | Lookup::Database(line) => Some(line),
            Lookup::NotFound => None,
        }
    }

    /// Returns `true` if either tier held the key.
    pub fn is_found(&self) -> bool {
        !matches!(self, Lookup::NotFound)
    }

    /// The tier that answered, if any.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Lookup::Differential(_) => Some(Tier::Differential),
            Lookup::Database(_) => Some(Tier::Database),
            Lookup::NotFound => None,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line() {
            Some(line) => f.write_str(line),
            None => f.write_str("Key does not exist!"),
        }
    }
}

/// Retrieves the newest record for a key from a differential/database pair.
pub trait RecordRetriever {
    /// Retrieves the record for `key`, reporting I/O failures as errors.
    ///
    /// Whitespace in `key` is ignored. A key held by neither file is
    /// `Ok(Lookup::NotFound)`, never an error.
    fn try_retrieve(&self, key: &str) -> Result<Lookup>;

    /// Retrieves the record for `key`, degrading I/O failures to
    /// [`Lookup::NotFound`].
    ///
    /// Failures are logged at error level; the caller sees only the outcome.
    fn retrieve_record(&self, key: &str) -> Lookup {
        match self.try_retrieve(key) {
            Ok(lookup) => lookup,
            Err(e) => {
                log::error!("Failed to retrieve record for {:?}: {}", key, e);
                Lookup::NotFound
            }
        }
    }
}
