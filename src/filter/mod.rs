//! Bloom filter with pluggable hash families.
//!
//! A [`BloomFilter`] owns a monotonic [`BitArray`] and one [`HashFamily`]. The
//! family produces `k` index functions over `[0, filter_size)`; the filter drives
//! them for both insertion and membership tests.
//!
//! Three families are available, selected with [`FamilyKind`]:
//!
//! - [`FnvFamily`]: FNV-1a mixing with a random prime offset basis per function
//! - [`MurmurFamily`]: 64-bit MurmurHash2 with a random seed per function
//! - [`RotationFamily`]: no secondary hash; each function sees a rotated variant
//!   of the input and uses its base-31 polynomial hash

pub mod affine;
pub mod bits;
pub mod bloom;
pub mod fnv;
pub mod murmur;
pub mod rotation;

pub use affine::AffineCoefficients;
pub use bits::BitArray;
pub use bloom::BloomFilter;
pub use fnv::FnvFamily;
pub use murmur::MurmurFamily;
pub use rotation::RotationFamily;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::LN_2;
use std::fmt;
use std::str::FromStr;

/// A set of `k` index functions mapping a string to `[0, filter_size)`.
pub trait HashFamily: fmt::Debug + Send + Sync {
    /// Number of index functions in the family.
    fn num_hashes(&self) -> usize;

    /// Feeds `h_0(key)..h_{k-1}(key)` to `visit` in order.
    ///
    /// Stops as soon as `visit` returns `false` and reports whether every index
    /// was visited. `key` is expected to be lowercased already.
    fn probe(&self, key: &str, visit: &mut dyn FnMut(usize) -> bool) -> bool;
}

/// Selects a [`HashFamily`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    /// FNV mixing with a prime offset basis per function.
    #[default]
    Fnv,
    /// 64-bit MurmurHash2 with a random seed per function.
    Murmur,
    /// Input rotation with the base-31 polynomial hash.
    Rotation,
}

impl FamilyKind {
    /// All family kinds, in declaration order.
    pub const ALL: [FamilyKind; 3] = [FamilyKind::Fnv, FamilyKind::Murmur, FamilyKind::Rotation];

    /// Number of hash functions for a filter with these parameters.
    ///
    /// The FNV and Murmur families use `floor(ln2 * bits_per_element)`; the
    /// rotation family uses `floor(ln2 * filter_size / set_size)`. The result is
    /// never below 1.
    pub fn num_hashes(self, set_size: usize, bits_per_element: usize, filter_size: usize) -> usize {
        let k = match self {
            FamilyKind::Fnv | FamilyKind::Murmur => LN_2 * bits_per_element as f64,
            FamilyKind::Rotation => LN_2 * filter_size as f64 / set_size.max(1) as f64,
        };
        (k.floor() as usize).max(1)
    }

    /// Generates a family of `k` functions over `[0, filter_size)`.
    pub fn build<R: Rng + ?Sized>(
        self,
        filter_size: usize,
        k: usize,
        rng: &mut R,
    ) -> Box<dyn HashFamily> {
        match self {
            FamilyKind::Fnv => Box::new(FnvFamily::new(filter_size, k, rng)),
            FamilyKind::Murmur => Box::new(MurmurFamily::new(filter_size, k, rng)),
            FamilyKind::Rotation => Box::new(RotationFamily::new(filter_size, k, rng)),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            FamilyKind::Fnv => "fnv",
            FamilyKind::Murmur => "murmur",
            FamilyKind::Rotation => "rotation",
        }
    }
}

impl fmt::Display for FamilyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fnv" => Ok(FamilyKind::Fnv),
            "murmur" => Ok(FamilyKind::Murmur),
            "rotation" | "ran" => Ok(FamilyKind::Rotation),
            other => Err(crate::Error::invalid_argument(format!("unknown hash family: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_num_hashes_per_family() {
        // floor(0.693 * 8) = 5
        assert_eq!(FamilyKind::Fnv.num_hashes(1000, 8, 8009), 5);
        assert_eq!(FamilyKind::Murmur.num_hashes(1000, 8, 8009), 5);
        // floor(0.693 * 8009 / 1000) = 5
        assert_eq!(FamilyKind::Rotation.num_hashes(1000, 8, 8009), 5);

        // The formulas diverge once the prime gap is large relative to set_size.
        assert_eq!(FamilyKind::Fnv.num_hashes(1, 3, 3), 2);
        assert_eq!(FamilyKind::Rotation.num_hashes(1, 3, 3), 2);
        assert_eq!(FamilyKind::Fnv.num_hashes(2, 4, 11), 2);
        assert_eq!(FamilyKind::Rotation.num_hashes(2, 4, 11), 3);
    }

    #[test]
    fn test_num_hashes_at_least_one() {
        for kind in FamilyKind::ALL {
            assert_eq!(kind.num_hashes(100, 1, 101), 1);
        }
    }

    #[test]
    fn test_build_respects_k() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in FamilyKind::ALL {
            let family = kind.build(101, 4, &mut rng);
            assert_eq!(family.num_hashes(), 4);

            let mut seen = Vec::new();
            assert!(family.probe("galaxy", &mut |idx| {
                seen.push(idx);
                true
            }));
            assert_eq!(seen.len(), 4);
            assert!(seen.iter().all(|&idx| idx < 101));
        }
    }

    #[test]
    fn test_probe_short_circuits() {
        let mut rng = StdRng::seed_from_u64(2);
        for kind in FamilyKind::ALL {
            let family = kind.build(101, 5, &mut rng);
            let mut calls = 0;
            assert!(!family.probe("galaxy", &mut |_| {
                calls += 1;
                false
            }));
            assert_eq!(calls, 1);
        }
    }

    #[test]
    fn test_family_kind_parse() {
        assert_eq!("fnv".parse::<FamilyKind>().unwrap(), FamilyKind::Fnv);
        assert_eq!("Murmur".parse::<FamilyKind>().unwrap(), FamilyKind::Murmur);
        assert_eq!("rotation".parse::<FamilyKind>().unwrap(), FamilyKind::Rotation);
        assert!("sha1".parse::<FamilyKind>().is_err());
        assert_eq!(FamilyKind::Murmur.to_string(), "murmur");
    }

    #[test]
    fn test_family_kind_serde() {
        let json = serde_json::to_string(&FamilyKind::Rotation).unwrap();
        assert_eq!(json, "\"rotation\"");
        let kind: FamilyKind = serde_json::from_str("\"murmur\"").unwrap();
        assert_eq!(kind, FamilyKind::Murmur);
    }
}
