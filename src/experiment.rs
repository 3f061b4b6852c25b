//! Empirical checks of filter quality and retrieval latency.
//!
//! [`false_positive_trial`] measures a family's observed false positive rate
//! against the theoretical `0.6185^bits_per_element`. [`compare_retrieval`] times
//! the filtered and naive retrievers on the same keys and counts any answers on
//! which they disagree.

use crate::error::{Error, Result};
use crate::filter::{BloomFilter, FamilyKind};
use crate::lookup::RecordRetriever;
use crate::record::fold_case;
use crate::source::RecordFile;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Shortest generated key.
pub const MIN_KEY_LEN: usize = 6;
/// Longest generated key.
pub const MAX_KEY_LEN: usize = 12;
/// Every `PROBE_INTERVAL`-th distinct string becomes a probe.
pub const PROBE_INTERVAL: usize = 11;

/// Disjoint sets of random keys: one to insert, one to probe with.
#[derive(Debug, Clone)]
pub struct KeySets {
    inserted: Vec<String>,
    probes: Vec<String>,
}

impl KeySets {
    /// Generates `count` distinct keys to insert plus roughly `count / 10` probes.
    ///
    /// Keys are lowercase ASCII of length 6 to 12.
    pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut seen = HashSet::with_capacity(count + count / 10);
        let mut inserted = Vec::with_capacity(count);
        let mut probes = Vec::with_capacity(count / 10 + 1);
        let mut distinct = 0usize;

        while inserted.len() < count {
            let len = rng.random_range(MIN_KEY_LEN..=MAX_KEY_LEN);
            let key: String = (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect();
            if !seen.insert(key.clone()) {
                continue;
            }

            distinct += 1;
            if distinct % PROBE_INTERVAL == 0 {
                probes.push(key);
            } else {
                inserted.push(key);
            }
        }

        Self { inserted, probes }
    }

    /// Builds key sets from explicit lists. The lists should be disjoint.
    pub fn from_parts(inserted: Vec<String>, probes: Vec<String>) -> Self {
        Self { inserted, probes }
    }

    /// Keys inserted into the filter.
    pub fn inserted(&self) -> &[String] {
        &self.inserted
    }

    /// Keys never inserted, used to count false positives.
    pub fn probes(&self) -> &[String] {
        &self.probes
    }
}

/// Result of one [`false_positive_trial`].
#[derive(Debug, Clone, PartialEq)]
pub struct FalsePositiveReport {
    /// Family under test.
    pub family: FamilyKind,
    /// Bits per element the filter was sized with.
    pub bits_per_element: usize,
    /// Probes the filter wrongly reported as present.
    pub false_positives: usize,
    /// Number of probes.
    pub probes: usize,
    /// Filter size in bits.
    pub filter_size: usize,
    /// Keys inserted.
    pub data_size: usize,
    /// Hash functions used.
    pub num_hashes: usize,
}

impl FalsePositiveReport {
    /// Fraction of probes that were false positives.
    pub fn observed_rate(&self) -> f64 {
        if self.probes == 0 {
            return 0.0;
        }
        self.false_positives as f64 / self.probes as f64
    }

    /// `0.6185^bits_per_element`.
    pub fn theoretical_rate(&self) -> f64 {
        BloomFilter::theoretical_false_positive_rate(self.bits_per_element)
    }
}

impl fmt::Display for FalsePositiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "******** {} RESULTS ({} bits/element) ********",
            self.family, self.bits_per_element
        )?;
        writeln!(f, "False positives: {}/{}", self.false_positives, self.probes)?;
        writeln!(f, "filter_size: {}", self.filter_size)?;
        writeln!(f, "data_size: {}", self.data_size)?;
        writeln!(f, "num_hashes: {}", self.num_hashes)?;
        writeln!(f, "false positive rate: {:.6}", self.observed_rate())?;
        write!(f, "theoretical false positive rate: {:.6}", self.theoretical_rate())
    }
}

/// Inserts `keys.inserted()` into a fresh filter and counts how many of
/// `keys.probes()` it reports as present.
pub fn false_positive_trial<R: Rng + ?Sized>(
    keys: &KeySets,
    family: FamilyKind,
    bits_per_element: usize,
    rng: &mut R,
) -> Result<FalsePositiveReport> {
    let mut filter = BloomFilter::with_rng(keys.inserted.len(), bits_per_element, family, rng)?;
    for key in &keys.inserted {
        filter.add(key);
    }

    let false_positives = keys.probes.iter().filter(|key| filter.appears(key)).count();

    let report = FalsePositiveReport {
        family,
        bits_per_element,
        false_positives,
        probes: keys.probes.len(),
        filter_size: filter.filter_size(),
        data_size: filter.data_size(),
        num_hashes: filter.num_hashes(),
    };

    log::info!(
        "{} filter at {} bits/element: observed {:.6}, theoretical {:.6}",
        family,
        bits_per_element,
        report.observed_rate(),
        report.theoretical_rate()
    );

    Ok(report)
}

/// Where query keys are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMode {
    /// Any database record.
    Database,
    /// Any differential record.
    Differential,
    /// Database records absent from the differential file.
    DatabaseOnly,
}

impl SampleMode {
    /// All sample modes.
    pub const ALL: [SampleMode; 3] =
        [SampleMode::Database, SampleMode::Differential, SampleMode::DatabaseOnly];
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleMode::Database => "random database key",
            SampleMode::Differential => "random differential key",
            SampleMode::DatabaseOnly => "random database-only key",
        })
    }
}

/// Draws `count` keys, with replacement, according to `mode`.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the mode has no candidate keys, or an I/O
/// error if a file cannot be read.
pub fn sample_keys<R: Rng + ?Sized>(
    mode: SampleMode,
    differential: &RecordFile,
    database: &RecordFile,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let candidates = match mode {
        SampleMode::Database => database.keys()?,
        SampleMode::Differential => differential.keys()?,
        SampleMode::DatabaseOnly => {
            let shadowed: HashSet<String> =
                differential.keys()?.iter().map(|key| fold_case(key)).collect();
            database
                .keys()?
                .into_iter()
                .filter(|key| !shadowed.contains(&fold_case(key)))
                .collect()
        }
    };

    if candidates.is_empty() {
        return Err(Error::not_found(format!("no keys to sample for mode: {}", mode)));
    }

    Ok((0..count).filter_map(|_| candidates.choose(&mut *rng).cloned()).collect())
}

/// Timing of the filtered and naive retrievers over the same keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    /// Number of keys queried.
    pub queries: usize,
    /// Total time spent in the filtered retriever.
    pub filtered_total: Duration,
    /// Total time spent in the naive retriever.
    pub naive_total: Duration,
    /// Keys on which the two retrievers disagreed.
    pub mismatches: usize,
}

impl ComparisonReport {
    /// Mean filtered retrieval time.
    pub fn filtered_average(&self) -> Duration {
        average(self.filtered_total, self.queries)
    }

    /// Mean naive retrieval time.
    pub fn naive_average(&self) -> Duration {
        average(self.naive_total, self.queries)
    }

    /// Naive time divided by filtered time.
    pub fn speedup(&self) -> f64 {
        let filtered = self.filtered_total.as_secs_f64();
        if filtered == 0.0 {
            return 0.0;
        }
        self.naive_total.as_secs_f64() / filtered
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Queries: {} ({} mismatches)", self.queries, self.mismatches)?;
        writeln!(f, "Average filtered retrieval: {:?}", self.filtered_average())?;
        writeln!(f, "Average naive retrieval: {:?}", self.naive_average())?;
        write!(f, "Speedup: {:.2}x", self.speedup())
    }
}

fn average(total: Duration, count: usize) -> Duration {
    match u32::try_from(count) {
        Ok(0) => Duration::ZERO,
        Ok(n) => total / n,
        Err(_) => total.div_f64(count as f64),
    }
}

/// Runs every key through both retrievers, timing each and comparing answers.
pub fn compare_retrieval<F, N>(filtered: &F, naive: &N, keys: &[String]) -> ComparisonReport
where
    F: RecordRetriever + ?Sized,
    N: RecordRetriever + ?Sized,
{
    let mut report = ComparisonReport { queries: keys.len(), ..ComparisonReport::default() };

    for key in keys {
        let start = Instant::now();
        let fast = filtered.retrieve_record(key);
        report.filtered_total += start.elapsed();

        let start = Instant::now();
        let slow = naive.retrieve_record(key);
        report.naive_total += start.elapsed();

        if fast != slow {
            log::warn!("Retrievers disagree on {:?}: {:?} vs {:?}", key, fast, slow);
            report.mismatches += 1;
        }
    }

    report
}
