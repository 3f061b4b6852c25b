//! Prime search used for filter sizing and hash seeding.
//!
//! Both call sites run the same search. [`least_prime_at_least`] sizes the bit
//! array so the affine index functions work modulo a prime, while
//! [`random_prime_seed`] turns a random draw into a prime-valued FNV offset basis.

use rand::Rng;

/// Returns `true` if `n` is prime.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    // Every prime above 3 has the form 6k ± 1.
    let mut i = 5u64;
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Finds the smallest prime that is at least `n`.
///
/// Inputs below 2 are clamped to 2.
pub fn least_prime_at_least(n: u64) -> u64 {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Derives a prime-valued seed from a random draw.
///
/// Draws a nonzero 32-bit signed integer, takes its magnitude and rounds it up
/// to the next prime.
pub fn random_prime_seed<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    let draw = loop {
        let x: i32 = rng.random();
        if x != 0 {
            break x;
        }
    };
    least_prime_at_least(u64::from(draw.unsigned_abs()))
}
