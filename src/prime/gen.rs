use num_bigint::{BigUint, RandBigInt};
use num_traits::One;
use rand::Rng;
use thiserror::Error;

use super::ver::is_prime;

pub const MIN_PRIME_BITS: u64 = 2;
pub const MAX_PRIME_BITS: u64 = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenError {
    #[error("prime size of {0} bits is not supported")]
    BadSize(u64),

    #[error("no prime found after {0} attempts")]
    Exhausted(u64),
}

/// Upper bound on the number of candidates drawn for a prime of `bits` bits
pub fn max_attempts(bits: u64) -> u64 {
    64 * bits + 1024
}

fn check_size(bits: u64, min: u64) -> Result<(), GenError> {
    if bits < min || bits > MAX_PRIME_BITS {
        return Err(GenError::BadSize(bits));
    }
    Ok(())
}

/// Random odd number with the top bit forced, so it has exactly `bits` bits.
/// `low_mask` selects extra low bits to set.
fn candidate<R: Rng + ?Sized>(rng: &mut R, bits: u64, low_mask: u32) -> BigUint {
    let top = BigUint::one() << (bits - 1) as usize;
    rng.gen_biguint(bits) | top | BigUint::from(low_mask | 1)
}

fn search<R, F>(rng: &mut R, bits: u64, low_mask: u32, accept: F) -> Result<BigUint, GenError>
where
    R: Rng + ?Sized,
    F: Fn(&BigUint) -> bool,
{
    let attempts = max_attempts(bits);
    for _ in 0..attempts {
        let p = candidate(rng, bits, low_mask);
        if accept(&p) {
            return Ok(p);
        }
        log::trace!("rejected prime candidate {}", p);
    }
    Err(GenError::Exhausted(attempts))
}

/// Generates a random prime of exactly `bits` bits
pub fn new_prime<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> Result<BigUint, GenError> {
    check_size(bits, MIN_PRIME_BITS)?;
    search(rng, bits, 0, is_prime)
}

/// Generates a prime `p` of exactly `bits` bits with `p ≡ 3 (mod 4)`
pub fn new_blum_prime<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> Result<BigUint, GenError> {
    check_size(bits, MIN_PRIME_BITS)?;
    search(rng, bits, 0b11, is_prime)
}

/// Generates a safe prime `p = 2q + 1` of exactly `bits` bits, where `q` is
/// prime as well. Every such `p` is `≡ 3 (mod 4)`.
pub fn new_safe_prime<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> Result<BigUint, GenError> {
    check_size(bits, MIN_PRIME_BITS + 1)?;
    let q = search(rng, bits - 1, 0, |q| is_prime(q) && is_prime(&((q << 1usize) + 1u32)))?;
    Ok((q << 1usize) + 1u32)
}
