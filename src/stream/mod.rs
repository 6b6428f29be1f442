//! Deterministic bit generators used as keystreams.
//!
//! Both generators start in a seeded state and advance one step per
//! [`Keystream::next_bit`] call. Generation is unbounded, the caller decides
//! how many bits to draw. When a consumer needs more bits than it has drawn,
//! it reuses them cyclically (see [`gamma::apply`]).

use num_bigint::BigUint;
use thiserror::Error;

/// Blum-Blum-Shub generator
pub mod bbs;

/// Seed derivation and the XOR gamma cipher
pub mod gamma;

/// Linear-feedback shift register
pub mod lfsr;

pub use bbs::Bbs;
pub use lfsr::Lfsr;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("tap position {0} is outside of the register")]
    TapOutOfRange(u8),

    #[error("at least one tap is required")]
    NoTaps,

    #[error("{0} is not a prime congruent to 3 mod 4")]
    NotBlumPrime(BigUint),

    #[error("keystream is empty")]
    EmptyKeystream,
}

/// Source of keystream bits
pub trait Keystream {
    /// Advances the generator one step and returns the emitted bit (0 or 1)
    fn next_bit(&mut self) -> u8;

    /// Draws `n` bits
    fn take(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next_bit()).collect()
    }
}
