//! Affine index functions `h(x) = (a * x + b) mod p`.

use rand::Rng;

/// Coefficients of one affine index function over a prime modulus.
///
/// `a` is drawn from `[1, p-1]` and `b` from `[0, p-1]`, so every function is a
/// bijection on `[0, p)` when `p` is prime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineCoefficients {
    a: u64,
    b: u64,
    modulus: u64,
}

impl AffineCoefficients {
    /// Draws fresh coefficients for the given modulus.
    ///
    /// A modulus below 2 has no valid `a`; `a` is then fixed to 1.
    pub fn random<R: Rng + ?Sized>(modulus: u64, rng: &mut R) -> Self {
        let a = if modulus > 1 { rng.random_range(1..modulus) } else { 1 };
        let b = if modulus > 0 { rng.random_range(0..modulus) } else { 0 };
        Self { a, b, modulus: modulus.max(1) }
    }

    /// Builds coefficients from explicit values, reducing them modulo `modulus`.
    pub fn from_parts(a: u64, b: u64, modulus: u64) -> Self {
        let modulus = modulus.max(1);
        let a = match a % modulus {
            0 => 1,
            a => a,
        };
        Self { a, b: b % modulus, modulus }
    }

    /// Maps a pre-hash value to an index in `[0, modulus)`.
    #[inline]
    pub fn apply(&self, x: u64) -> usize {
        let m = u128::from(self.modulus);
        ((u128::from(self.a) * u128::from(x) + u128::from(self.b)) % m) as usize
    }

    /// The multiplicative coefficient.
    pub fn a(&self) -> u64 {
        self.a
    }

    /// The additive coefficient.
    pub fn b(&self) -> u64 {
        self.b
    }
}
