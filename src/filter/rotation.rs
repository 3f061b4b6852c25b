//! Affine-rotation hash family.
//!
//! There is no secondary mixing hash here. Function `i` transforms the input
//! itself: the working string is padded with [`PAD`] until it holds at least `k`
//! characters, then its `i`-th character is appended. The transformation carries
//! over from one function to the next, so function `i` hashes the result of
//! `i + 1` successive appends. The transformed string's base-31 polynomial hash
//! is mapped through the function's affine coefficients.

use super::{AffineCoefficients, HashFamily};
use rand::Rng;

/// Filler appended to inputs shorter than `k` characters.
pub const PAD: char = '$';

/// Base-31 polynomial hash with 32-bit wraparound.
pub fn polynomial_hash(chars: &[char]) -> i32 {
    chars
        .iter()
        .fold(0i32, |h, &c| h.wrapping_mul(31).wrapping_add(u32::from(c) as i32))
}

/// `k` affine functions over successively rotated variants of the input.
#[derive(Debug, Clone)]
pub struct RotationFamily {
    functions: Vec<AffineCoefficients>,
}

impl RotationFamily {
    /// Generates `k` functions over `[0, filter_size)`.
    pub fn new<R: Rng + ?Sized>(filter_size: usize, k: usize, rng: &mut R) -> Self {
        let functions = (0..k)
            .map(|_| AffineCoefficients::random(filter_size as u64, rng))
            .collect();
        Self { functions }
    }

    /// Applies the transformation for function `i` in place.
    fn rotate(&self, working: &mut Vec<char>, i: usize) {
        let k = self.functions.len();
        if working.len() < k {
            working.resize(k, PAD);
        }
        let c = working[i];
        working.push(c);
    }
}

impl HashFamily for RotationFamily {
    fn num_hashes(&self) -> usize {
        self.functions.len()
    }

    fn probe(&self, key: &str, visit: &mut dyn FnMut(usize) -> bool) -> bool {
        let mut working: Vec<char> = key.chars().collect();
        working.reserve(self.functions.len() * 2);

        for (i, coefficients) in self.functions.iter().enumerate() {
            self.rotate(&mut working, i);
            let hash = polynomial_hash(&working);
            if !visit(coefficients.apply(u64::from(hash.unsigned_abs()))) {
                return false;
            }
        }
        true
    }
}
