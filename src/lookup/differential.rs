//! Filter-then-scan retrieval.

use super::{Lookup, LookupStats, RecordRetriever, StatsSnapshot};
use crate::config::LookupOptions;
use crate::error::Result;
use crate::filter::{BloomFilter, FamilyKind};
use crate::record::{normalize_query, KeyMatch};
use crate::source::{RecordFile, RecordReader};
use rand::Rng;
use std::path::Path;

/// Builds a filter holding the identity key of every record in `path`.
///
/// Performs one full scan of the file. Malformed lines are skipped.
pub fn build_filter<P: AsRef<Path>>(
    path: P,
    expected_items: usize,
    bits_per_element: usize,
    family: FamilyKind,
) -> Result<BloomFilter> {
    build_filter_with_rng(path, expected_items, bits_per_element, family, &mut rand::rng())
}

/// Like [`build_filter`], drawing hash coefficients from `rng`.
pub fn build_filter_with_rng<P: AsRef<Path>, R: Rng + ?Sized>(
    path: P,
    expected_items: usize,
    bits_per_element: usize,
    family: FamilyKind,
    rng: &mut R,
) -> Result<BloomFilter> {
    let path = path.as_ref();
    let mut filter = BloomFilter::with_rng(expected_items, bits_per_element, family, rng)?;

    let mut reader = RecordReader::open(path)?;
    while let Some(record) = reader.read_next()? {
        filter.add(record.key());
    }

    if filter.data_size() > expected_items {
        log::warn!(
            "{:?} holds {} records but the filter was sized for {}; false positive rate will exceed {:.4}",
            path,
            filter.data_size(),
            expected_items,
            BloomFilter::theoretical_false_positive_rate(bits_per_element)
        );
    }

    log::info!(
        "Built {} filter over {:?}: {} keys, {} bits, {} hashes, {} malformed lines skipped",
        family,
        path,
        filter.data_size(),
        filter.filter_size(),
        filter.num_hashes(),
        reader.skipped()
    );

    Ok(filter)
}

/// Retrieval that consults a Bloom filter before scanning the differential file.
///
/// The filter is built once over the differential file and never modified
/// afterwards; `DifferentialLookup` is `Sync` and can serve queries from
/// several threads through an `Arc`. If the differential file changes, build a
/// new `DifferentialLookup`.
///
/// # Example
/// ```no_run
/// use bloomdiff::lookup::{DifferentialLookup, RecordRetriever};
/// use bloomdiff::LookupOptions;
///
/// # fn main() -> Result<(), bloomdiff::Error> {
/// let options = LookupOptions::new("differential.txt", "database.txt").expected_items(1_262_147);
/// let lookup = DifferentialLookup::open(&options)?;
/// println!("{}", lookup.retrieve_record("Archbishop had given him"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DifferentialLookup {
    filter: BloomFilter,
    differential: RecordFile,
    database: RecordFile,
    key_match: KeyMatch,
    stats: LookupStats,
}

impl DifferentialLookup {
    /// Builds the differential filter described by `options`.
    pub fn open(options: &LookupOptions) -> Result<Self> {
        Self::open_with_rng(options, &mut rand::rng())
    }

    /// Like [`DifferentialLookup::open`], drawing hash coefficients from `rng`.
    pub fn open_with_rng<R: Rng + ?Sized>(options: &LookupOptions, rng: &mut R) -> Result<Self> {
        options.validate()?;

        let filter = build_filter_with_rng(
            &options.differential_path,
            options.expected_items,
            options.bits_per_element,
            options.family,
            rng,
        )?;

        Ok(Self::with_filter(
            filter,
            RecordFile::new(&options.differential_path),
            RecordFile::new(&options.database_path),
            options.key_match,
        ))
    }

    /// Wraps an already built filter.
    ///
    /// `filter` must hold every identity key of `differential`, otherwise the
    /// lookup can miss differential records.
    pub fn with_filter(
        filter: BloomFilter,
        differential: RecordFile,
        database: RecordFile,
        key_match: KeyMatch,
    ) -> Self {
        Self { filter, differential, database, key_match, stats: LookupStats::default() }
    }

    /// The filter over the differential file.
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// The differential file.
    pub fn differential(&self) -> &RecordFile {
        &self.differential
    }

    /// The database file.
    pub fn database(&self) -> &RecordFile {
        &self.database
    }

    /// Query counters since construction.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl RecordRetriever for DifferentialLookup {
    fn try_retrieve(&self, key: &str) -> Result<Lookup> {
        self.stats.record_query();
        let query = normalize_query(key);

        if self.filter.appears(&query) {
            self.stats.record_differential_scan();
            if let Some(line) = self.differential.find(&query, self.key_match)? {
                self.stats.record_differential_hit();
                return Ok(Lookup::Differential(line));
            }
            // Filter passed but the scan found nothing.
            self.stats.record_false_positive();
            log::debug!("Filter false positive for {:?}", query);
        } else {
            self.stats.record_filter_rejection();
            log::debug!("Filter rejected {:?}, skipping differential scan", query);
        }

        match self.database.find(&query, self.key_match)? {
            Some(line) => {
                self.stats.record_database_hit();
                Ok(Lookup::Database(line))
            }
            None => {
                self.stats.record_not_found();
                Ok(Lookup::NotFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_build_filter_adds_every_key() {
        let diff = record_file("a b c d 1 1 1\ne f g h 2 2 2\nmalformed line\n\ni j k l\n");
        let mut rng = StdRng::seed_from_u64(9);
        let filter = build_filter_with_rng(diff.path(), 10, 8, FamilyKind::Murmur, &mut rng).unwrap();

        assert_eq!(filter.data_size(), 3);
        assert!(filter.appears("abcd"));
        assert!(filter.appears("efgh"));
        assert!(filter.appears("IJKL"));
    }

    #[test]
    fn test_build_filter_missing_file() {
        let result = build_filter("/nonexistent/bloomdiff/diff.txt", 10, 8, FamilyKind::Fnv);
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_stats_track_paths() {
        let diff = record_file("Archbishop had given him 1720 8 6\n");
        let db = record_file(
            "Archbishop had given him 1650 1 1\narts colleges in Pennsylvania 1900 1 1\n",
        );
        let options = LookupOptions::new(diff.path(), db.path()).expected_items(10);
        let lookup = DifferentialLookup::open_with_rng(&options, &mut StdRng::seed_from_u64(4)).unwrap();

        assert!(matches!(
            lookup.try_retrieve("Archbishop had given him").unwrap(),
            Lookup::Differential(_)
        ));
        assert!(matches!(
            lookup.try_retrieve("arts colleges in Pennsylvania").unwrap(),
            Lookup::Database(_)
        ));
        assert_eq!(lookup.try_retrieve("no such key here").unwrap(), Lookup::NotFound);

        let stats = lookup.stats();
        assert_eq!(stats.queries, 3);
        assert_eq!(stats.differential_hits, 1);
        assert_eq!(stats.database_hits, 1);
        assert_eq!(stats.not_found, 1);
        assert_eq!(stats.filter_rejections + stats.differential_scans, 3);
        assert_eq!(stats.differential_scans, 1 + stats.false_positives);
    }
}
