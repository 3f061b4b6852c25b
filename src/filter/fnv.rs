//! FNV-affine hash family.

use super::{AffineCoefficients, HashFamily};
use crate::prime::random_prime_seed;
use rand::Rng;

/// 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a mixing of `key` starting from `offset_basis`.
///
/// Each character code is XORed in and the state multiplied by [`FNV_PRIME`]
/// with 64-bit wraparound.
pub fn fnv_hash(offset_basis: u64, key: &str) -> u64 {
    key.chars().fold(offset_basis, |hash, c| {
        (hash ^ u64::from(u32::from(c))).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone)]
struct FnvFunction {
    offset_basis: u64,
    coefficients: AffineCoefficients,
}

impl FnvFunction {
    #[inline]
    fn index(&self, key: &str) -> usize {
        let hash = fnv_hash(self.offset_basis, key) as i64;
        self.coefficients.apply(hash.unsigned_abs())
    }
}

/// `k` FNV functions, each with its own prime offset basis and affine coefficients.
#[derive(Debug, Clone)]
pub struct FnvFamily {
    functions: Vec<FnvFunction>,
}

impl FnvFamily {
    /// Generates `k` functions over `[0, filter_size)`.
    pub fn new<R: Rng + ?Sized>(filter_size: usize, k: usize, rng: &mut R) -> Self {
        let functions = (0..k)
            .map(|_| FnvFunction {
                offset_basis: random_prime_seed(rng),
                coefficients: AffineCoefficients::random(filter_size as u64, rng),
            })
            .collect();
        Self { functions }
    }

    /// Offset basis of every function, in order.
    pub fn offset_bases(&self) -> Vec<u64> {
        self.functions.iter().map(|f| f.offset_basis).collect()
    }
}

impl HashFamily for FnvFamily {
    fn num_hashes(&self) -> usize {
        self.functions.len()
    }

    fn probe(&self, key: &str, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        self.functions.iter().all(|f| visit(f.index(key)))
    }
}
