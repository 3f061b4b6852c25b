//! Query counters for the filtered retrieval path.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by [`DifferentialLookup`](super::DifferentialLookup).
///
/// Relaxed atomics: the counters are diagnostics, not synchronization.
#[derive(Debug, Default)]
pub struct LookupStats {
    queries: AtomicU64,
    filter_rejections: AtomicU64,
    differential_scans: AtomicU64,
    false_positives: AtomicU64,
    differential_hits: AtomicU64,
    database_hits: AtomicU64,
    not_found: AtomicU64,
}

/// Point-in-time copy of [`LookupStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Queries answered, including failed ones.
    pub queries: u64,
    /// Queries the filter proved absent from the differential file.
    pub filter_rejections: u64,
    /// Full or partial scans of the differential file.
    pub differential_scans: u64,
    /// Differential scans that found nothing.
    pub false_positives: u64,
    /// Queries answered from the differential file.
    pub differential_hits: u64,
    /// Queries answered from the database file.
    pub database_hits: u64,
    /// Queries found in neither file.
    pub not_found: u64,
}

impl StatsSnapshot {
    /// Fraction of differential scans that were false positives.
    pub fn false_positive_rate(&self) -> f64 {
        if self.differential_scans == 0 {
            return 0.0;
        }
        self.false_positives as f64 / self.differential_scans as f64
    }
}

impl LookupStats {
    pub(crate) fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filter_rejection(&self) {
        self.filter_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_differential_scan(&self) {
        self.differential_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_false_positive(&self) {
        self.false_positives.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_differential_hit(&self) {
        self.differential_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_database_hit(&self) {
        self.database_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            queries: self.queries.load(Ordering::Relaxed),
            filter_rejections: self.filter_rejections.load(Ordering::Relaxed),
            differential_scans: self.differential_scans.load(Ordering::Relaxed),
            false_positives: self.false_positives.load(Ordering::Relaxed),
            differential_hits: self.differential_hits.load(Ordering::Relaxed),
            database_hits: self.database_hits.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }
}
