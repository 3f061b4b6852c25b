//! Murmur-affine hash family.

use super::{AffineCoefficients, HashFamily};
use rand::Rng;

const M: u64 = 0xc6a4a7935bd1e995;
const SHIFT: u32 = 47;

/// 64-bit MurmurHash2 (variant 64A) of `data` with a 32-bit seed.
pub fn murmur_hash64(data: &[u8], seed: u32) -> u64 {
    let len = data.len();
    let mut h = u64::from(seed) ^ (len as u64).wrapping_mul(M);

    let mut blocks = data.chunks_exact(8);
    for block in &mut blocks {
        let mut word = [0u8; 8];
        word.copy_from_slice(block);
        let mut k = u64::from_le_bytes(word);

        k = k.wrapping_mul(M);
        k ^= k >> SHIFT;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate().rev() {
            h ^= u64::from(byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> SHIFT;
    h = h.wrapping_mul(M);
    h ^= h >> SHIFT;
    h
}

#[derive(Debug, Clone)]
struct MurmurFunction {
    seed: u32,
    coefficients: AffineCoefficients,
}

impl MurmurFunction {
    #[inline]
    fn index(&self, key: &str) -> usize {
        let hash = murmur_hash64(key.as_bytes(), self.seed) as i64;
        self.coefficients.apply(hash.unsigned_abs())
    }
}

/// `k` Murmur functions, each with its own seed and affine coefficients.
#[derive(Debug, Clone)]
pub struct MurmurFamily {
    functions: Vec<MurmurFunction>,
}

impl MurmurFamily {
    /// Generates `k` functions over `[0, filter_size)`.
    pub fn new<R: Rng + ?Sized>(filter_size: usize, k: usize, rng: &mut R) -> Self {
        let functions = (0..k)
            .map(|_| MurmurFunction {
                seed: rng.random(),
                coefficients: AffineCoefficients::random(filter_size as u64, rng),
            })
            .collect();
        Self { functions }
    }

    /// Seed of every function, in order.
    pub fn seeds(&self) -> Vec<u32> {
        self.functions.iter().map(|f| f.seed).collect()
    }
}

impl HashFamily for MurmurFamily {
    fn num_hashes(&self) -> usize {
        self.functions.len()
    }

    fn probe(&self, key: &str, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        self.functions.iter().all(|f| visit(f.index(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_input() {
        assert_eq!(murmur_hash64(b"", 0), 0);
        assert_ne!(murmur_hash64(b"", 1), 0);
    }

    #[test]
    fn test_known_values() {
        // One block only.
        assert_eq!(murmur_hash64(b"abcdefgh", 99), 0xe4dcba54b0313a35);
        // One block plus a one-byte tail.
        assert_eq!(murmur_hash64(b"abcdefghi", 99), 0x448ccf87752d63d1);
        // Three blocks plus a two-byte tail.
        assert_eq!(murmur_hash64(b"artscollegesinpennsylvania", 99), 0x90851eb06cebfb9d);
    }

    #[test]
    fn test_tail_bytes_matter() {
        // Lengths 7, 8 and 9 exercise the tail-only, block-only and mixed paths.
        let seven = murmur_hash64(b"abcdefg", 99);
        let eight = murmur_hash64(b"abcdefgh", 99);
        let nine = murmur_hash64(b"abcdefghi", 99);
        assert_ne!(seven, eight);
        assert_ne!(eight, nine);
        assert_ne!(murmur_hash64(b"abcdefghi", 99), murmur_hash64(b"abcdefghj", 99));
    }

    #[test]
    fn test_seed_changes_hash() {
        let data = b"artscollegesinpennsylvania";
        assert_eq!(murmur_hash64(data, 5), murmur_hash64(data, 5));
        assert_ne!(murmur_hash64(data, 5), murmur_hash64(data, 6));
    }

    #[test]
    fn test_family_seeds() {
        let family = MurmurFamily::new(1009, 5, &mut StdRng::seed_from_u64(21));
        assert_eq!(family.seeds().len(), 5);
        assert_eq!(family.num_hashes(), 5);
    }
}
