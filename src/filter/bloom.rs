//! Bloom Filter implementation.
//!
//! A space-efficient probabilistic data structure used to test whether an element
//! is a member of a set. False positive matches are possible, but false negatives are not.

use super::{BitArray, FamilyKind, HashFamily};
use crate::error::{Error, Result};
use crate::prime::least_prime_at_least;
use crate::record::fold_case;
use rand::Rng;

/// Largest supported filter, in bits (512 MiB of bit array).
pub const MAX_FILTER_SIZE: usize = u32::MAX as usize;

/// Base of the theoretical false positive rate `0.6185^bits_per_element`.
pub const FALSE_POSITIVE_BASE: f64 = 0.6185;

/// BloomFilter provides case-insensitive probabilistic set membership testing.
///
/// The filter is sized once at construction and never shrinks or forgets keys.
/// Insertion needs `&mut self`, so a filter is built with exclusive access and
/// can then be shared read-only across threads.
///
/// # Example
/// ```
/// use bloomdiff::filter::{BloomFilter, FamilyKind};
///
/// let mut filter = BloomFilter::new(1000, 8, FamilyKind::Murmur).unwrap();
/// filter.add("Archbishop had given him");
///
/// assert!(filter.appears("archbishop had given him"));
/// assert_eq!(filter.data_size(), 1);
/// ```
#[derive(Debug)]
pub struct BloomFilter {
    /// Bit array for the bloom filter
    bits: BitArray,
    /// Index functions shared by add and appears
    family: Box<dyn HashFamily>,
    /// Which family `family` is
    kind: FamilyKind,
    /// Number of add calls so far
    data_size: usize,
}

impl BloomFilter {
    /// Creates a filter for `set_size` elements at `bits_per_element` bits each.
    ///
    /// Hash coefficients and seeds come from the thread-local OS-seeded generator,
    /// so two filters built this way hash differently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if either argument is zero or the
    /// filter would exceed [`MAX_FILTER_SIZE`] bits.
    pub fn new(set_size: usize, bits_per_element: usize, kind: FamilyKind) -> Result<Self> {
        Self::with_rng(set_size, bits_per_element, kind, &mut rand::rng())
    }

    /// Creates a filter drawing its hash coefficients from `rng`.
    ///
    /// Filters built from identically seeded generators behave identically.
    pub fn with_rng<R: Rng + ?Sized>(
        set_size: usize,
        bits_per_element: usize,
        kind: FamilyKind,
        rng: &mut R,
    ) -> Result<Self> {
        let filter_size = Self::optimal_filter_size(set_size, bits_per_element)?;
        let num_hashes = kind.num_hashes(set_size, bits_per_element, filter_size);
        let family = kind.build(filter_size, num_hashes, rng);

        log::debug!(
            "Created {} bloom filter: {} bits, {} hashes for {} elements",
            kind,
            filter_size,
            num_hashes,
            set_size
        );

        Ok(Self { bits: BitArray::new(filter_size), family, kind, data_size: 0 })
    }

    /// Smallest prime that is at least `set_size * bits_per_element`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for zero inputs, or when the size would
    /// exceed [`MAX_FILTER_SIZE`].
    pub fn optimal_filter_size(set_size: usize, bits_per_element: usize) -> Result<usize> {
        if set_size == 0 {
            return Err(Error::invalid_argument("set_size must be > 0"));
        }
        if bits_per_element == 0 {
            return Err(Error::invalid_argument("bits_per_element must be > 0"));
        }
        let target = set_size.checked_mul(bits_per_element).ok_or_else(|| {
            Error::invalid_argument(format!(
                "filter of {} x {} bits overflows",
                set_size, bits_per_element
            ))
        })?;
        let too_large = || {
            Error::invalid_argument(format!(
                "filter of {} x {} bits exceeds the {} bit limit",
                set_size, bits_per_element, MAX_FILTER_SIZE
            ))
        };
        if target > MAX_FILTER_SIZE {
            return Err(too_large());
        }

        let filter_size = least_prime_at_least(target as u64);
        match usize::try_from(filter_size) {
            Ok(size) if size <= MAX_FILTER_SIZE => Ok(size),
            _ => Err(too_large()),
        }
    }

    /// Add a key to the filter. Case-insensitive.
    pub fn add(&mut self, key: &str) {
        let key = fold_case(key);
        let bits = &mut self.bits;
        self.family.probe(&key, &mut |idx| {
            bits.set(idx);
            true
        });
        self.data_size += 1;
    }

    /// Check if a key may be in the set. Case-insensitive.
    ///
    /// Returns `false` only if the key was definitely never added.
    pub fn appears(&self, key: &str) -> bool {
        let key = fold_case(key);
        self.family.probe(&key, &mut |idx| self.bits.get(idx))
    }

    /// Number of bits in the filter. Always prime.
    pub fn filter_size(&self) -> usize {
        self.bits.len()
    }

    /// Number of `add` calls made on this filter.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Number of hash functions used.
    pub fn num_hashes(&self) -> usize {
        self.family.num_hashes()
    }

    /// The hash family backing this filter.
    pub fn family(&self) -> FamilyKind {
        self.kind
    }

    /// Number of bits currently set.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Size of the bit array in bytes.
    pub fn size_in_bytes(&self) -> usize {
        self.bits.size_in_bytes()
    }

    /// Approximate false positive rate for the current contents.
    ///
    /// p = (1 - e^(-kn/m))^k where k = num_hashes, n = data_size, m = filter_size
    pub fn estimated_false_positive_rate(&self) -> f64 {
        if self.data_size == 0 {
            return 0.0;
        }

        let k = self.num_hashes() as f64;
        let n = self.data_size as f64;
        let m = self.filter_size() as f64;

        (1.0 - (-k * n / m).exp()).powf(k)
    }

    /// Expected false positive rate of an optimally tuned filter with
    /// `bits_per_element` bits per element.
    pub fn theoretical_false_positive_rate(bits_per_element: usize) -> f64 {
        FALSE_POSITIVE_BASE.powf(bits_per_element as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prime::is_prime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(set_size: usize, bits: usize, kind: FamilyKind, seed: u64) -> BloomFilter {
        BloomFilter::with_rng(set_size, bits, kind, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_bloom_filter_basic() {
        for kind in FamilyKind::ALL {
            let mut filter = seeded(100, 8, kind, 1);

            filter.add("key1");
            filter.add("key2");
            filter.add("key3");

            assert!(filter.appears("key1"));
            assert!(filter.appears("key2"));
            assert!(filter.appears("key3"));
            assert_eq!(filter.data_size(), 3);
            assert_eq!(filter.family(), kind);
        }
    }

    #[test]
    fn test_bloom_filter_no_false_negatives() {
        for kind in FamilyKind::ALL {
            let mut filter = seeded(1000, 8, kind, 2);

            let keys: Vec<String> = (0..1000).map(|i| format!("key{}", i)).collect();
            for key in &keys {
                filter.add(key);
            }

            for key in &keys {
                assert!(filter.appears(key), "{} false negative for key: {}", kind, key);
            }
        }
    }

    #[test]
    fn test_bloom_filter_case_insensitive() {
        for kind in FamilyKind::ALL {
            let mut filter = seeded(100, 8, kind, 3);
            filter.add("Galaxy");

            assert!(filter.appears("galaxy"));
            assert!(filter.appears("GALAXY"));
            assert!(filter.appears("gaLaxY"));
        }
    }

    #[test]
    fn test_bloom_filter_final_sigma() {
        for kind in FamilyKind::ALL {
            let mut filter = seeded(100, 8, kind, 9);
            filter.add("ΟΔΟΣ");
            assert!(filter.appears("οδοσ"));
            assert!(filter.appears("ΟΔΟΣ"));

            // Titlecase letters lowercase like their uppercase forms.
            filter.add("ǆemal");
            assert!(filter.appears("ǅemal"));
        }
    }

    #[test]
    fn test_bloom_filter_empty() {
        for kind in FamilyKind::ALL {
            let filter = seeded(100, 8, kind, 4);
            assert!(!filter.appears("key1"));
            assert_eq!(filter.bits_set(), 0);
            assert_eq!(filter.estimated_false_positive_rate(), 0.0);
        }
    }

    #[test]
    fn test_bloom_filter_sizing() {
        let filter = seeded(1000, 8, FamilyKind::Fnv, 5);
        assert_eq!(filter.filter_size(), 8009);
        assert!(is_prime(filter.filter_size() as u64));
        assert_eq!(filter.num_hashes(), 5);
        assert_eq!(filter.size_in_bytes(), 1002);
    }

    #[test]
    fn test_bloom_filter_invalid_arguments() {
        assert!(matches!(
            BloomFilter::new(0, 8, FamilyKind::Fnv),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            BloomFilter::new(10, 0, FamilyKind::Murmur),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            BloomFilter::new(usize::MAX, 2, FamilyKind::Rotation),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_bloom_filter_size_limit() {
        // Fits in usize but not in the bit limit: rejected before allocating.
        assert!(matches!(
            BloomFilter::new(1usize << 40, 8, FamilyKind::Murmur),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            BloomFilter::optimal_filter_size(MAX_FILTER_SIZE, 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            BloomFilter::optimal_filter_size(MAX_FILTER_SIZE / 2 + 1, 2),
            Err(Error::InvalidArgument(_))
        ));
        // The largest prime below 2^32 is 2^32 - 5.
        assert_eq!(
            BloomFilter::optimal_filter_size((1usize << 32) - 6, 1).unwrap(),
            (1usize << 32) - 5
        );
    }

    #[test]
    fn test_bloom_filter_reproducible_with_seed() {
        for kind in FamilyKind::ALL {
            let mut a = seeded(500, 6, kind, 77);
            let mut b = seeded(500, 6, kind, 77);
            for i in 0..200 {
                let key = format!("record {}", i);
                a.add(&key);
                b.add(&key);
            }
            assert_eq!(a.bits_set(), b.bits_set());
            for i in 0..1000 {
                let probe = format!("probe {}", i);
                assert_eq!(a.appears(&probe), b.appears(&probe));
            }
        }
    }

    #[test]
    fn test_bloom_filter_add_sets_at_most_k_bits() {
        for kind in FamilyKind::ALL {
            let mut filter = seeded(1000, 10, kind, 6);
            filter.add("solitary");
            assert!(filter.bits_set() >= 1);
            assert!(filter.bits_set() <= filter.num_hashes());
        }
    }

    #[test]
    fn test_bloom_filter_estimated_fp_rate() {
        let mut filter = seeded(1000, 10, FamilyKind::Murmur, 7);
        for i in 0..1000 {
            filter.add(&format!("key{}", i));
        }

        let estimated = filter.estimated_false_positive_rate();
        let theoretical = BloomFilter::theoretical_false_positive_rate(10);

        println!("Estimated FP rate: {:.6}", estimated);
        println!("Theoretical FP rate: {:.6}", theoretical);

        assert!(estimated > 0.0);
        assert!(estimated < 0.02);
        assert!((theoretical - 0.00815).abs() < 0.0005);
    }
}
