//! # bloomdiff - Bloom-filtered differential file lookup
//!
//! bloomdiff answers key lookups over a two-tier text store: a small, frequently
//! changing differential file shadows records in a large, mostly-static database
//! file. A query returns the differential record if there is one, else the
//! database record, else [`Lookup::NotFound`].
//!
//! ## Architecture
//!
//! - **Prime sizing**: filters hold a prime number of bits
//! - **Hash families**: FNV-affine, Murmur-affine and affine-rotation index functions
//! - **Bloom Filter**: built once over the differential file, read-only afterwards
//! - **Differential lookup**: skips the differential scan when the filter proves
//!   the key absent
//! - **Naive lookup**: always scans the differential file; the correctness baseline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bloomdiff::{DifferentialLookup, FamilyKind, LookupOptions, RecordRetriever};
//!
//! # fn main() -> Result<(), bloomdiff::Error> {
//! let options = LookupOptions::new("differential.txt", "database.txt")
//!     .expected_items(1_262_147)
//!     .bits_per_element(8)
//!     .family(FamilyKind::Murmur);
//!
//! // One full pass over the differential file builds the filter
//! let lookup = DifferentialLookup::open(&options)?;
//!
//! match lookup.try_retrieve("Archbishop had given him")? {
//!     bloomdiff::Lookup::NotFound => println!("not found"),
//!     found => println!("{}", found),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Module declarations
pub mod config;
pub mod error;
pub mod experiment;
pub mod filter;
pub mod lookup;
pub mod prime;
pub mod record;
pub mod source;

// Re-exports
pub use config::LookupOptions;
pub use error::{Error, Result};
pub use filter::{BloomFilter, FamilyKind, HashFamily};
pub use lookup::{DifferentialLookup, Lookup, NaiveLookup, RecordRetriever};
pub use record::KeyMatch;
pub use source::RecordFile;
