//! Merkle-Hellman knapsack cryptosystem.
//!
//! The private key is a super-increasing vector together with a modulus `m`
//! and a multiplier `w`. The public key is the vector disguised as
//! `public[i] = secret[i] * w mod m`. A byte is encrypted as the sum of the
//! public elements selected by its bits. Bit `i` (least significant first)
//! selects element `i`.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;
use thiserror::Error;

use crate::algo::{gcd, invmod};

/// Block width in bits, one byte per ciphertext unit
pub const DEFAULT_WIDTH: usize = 8;
pub const MAX_WIDTH: usize = 8;

/// Each secret element exceeds the running sum by at most this much
const ELEMENT_SPREAD: u32 = 200;

/// The modulus exceeds the sum of the secret vector by a slack in this range
const MIN_SLACK: u32 = 100;
const MAX_SLACK: u32 = 500;

/// Upper bound on multiplier draws
const MAX_ATTEMPTS: u32 = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KnapsackError {
    #[error("symbol {symbol} doesn't fit into {width} bits")]
    SymbolOutOfRange { symbol: u64, width: usize },

    #[error("ciphertext {0} can't be decoded with this key")]
    Decode(BigUint),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KnapsackGenError {
    #[error("width {0} is not supported")]
    BadWidth(usize),

    #[error("secret vector is not super-increasing at index {0}")]
    NotSuperIncreasing(usize),

    #[error("modulus must exceed the sum of the secret vector")]
    ModulusTooSmall,

    #[error("multiplier has no inverse modulo m")]
    NoInverse,

    #[error("no multiplier coprime with the modulus after {0} attempts")]
    Exhausted(u32),
}

/// Knapsack private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackPrivate {
    secret: Vec<BigUint>,
    m: BigUint,
    w: BigUint,
    w_inv: BigUint,
}

/// Knapsack public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnapsackPublic {
    public: Vec<BigUint>,
    m: BigUint,
}

/// Index of the first element that is not larger than the sum of its
/// predecessors, if any
fn super_increasing_violation(vector: &[BigUint]) -> Option<usize> {
    let mut sum = BigUint::zero();
    for (i, a) in vector.iter().enumerate() {
        if a <= &sum {
            return Some(i);
        }
        sum += a;
    }
    None
}

impl KnapsackPrivate {
    /// Builds a private key from its parts, checking every invariant the
    /// greedy decoder relies on, and computes `w^-1 mod m`
    pub fn new(secret: Vec<BigUint>, m: BigUint, w: BigUint) -> Result<Self, KnapsackGenError> {
        if secret.is_empty() || secret.len() > MAX_WIDTH {
            return Err(KnapsackGenError::BadWidth(secret.len()));
        }
        if let Some(i) = super_increasing_violation(&secret) {
            return Err(KnapsackGenError::NotSuperIncreasing(i));
        }
        let sum: BigUint = secret.iter().sum();
        if m <= sum {
            return Err(KnapsackGenError::ModulusTooSmall);
        }
        let w_inv = invmod(&w, &m).ok_or(KnapsackGenError::NoInverse)?;
        Ok(Self {
            secret,
            m,
            w,
            w_inv,
        })
    }

    /// Derives the public vector `secret[i] * w mod m`
    pub fn public_key(&self) -> KnapsackPublic {
        let public = self.secret.iter().map(|a| (a * &self.w) % &self.m).collect();
        KnapsackPublic {
            public,
            m: self.m.clone(),
        }
    }

    /// Recovers a byte: `c' = c * w^-1 mod m`, then greedily subtracts secret
    /// elements from the largest down. Fails if anything is left over.
    pub fn decrypt(&self, cipher: &BigUint) -> Result<u8, KnapsackError> {
        let mut rest = (cipher * &self.w_inv) % &self.m;
        let mut byte = 0u8;
        for (i, a) in self.secret.iter().enumerate().rev() {
            if &rest >= a {
                rest -= a;
                byte |= 1 << i;
            }
        }
        if !rest.is_zero() {
            return Err(KnapsackError::Decode(cipher.clone()));
        }
        Ok(byte)
    }

    pub fn decrypt_all(&self, ciphers: &[BigUint]) -> Result<Vec<u8>, KnapsackError> {
        ciphers.iter().map(|c| self.decrypt(c)).collect()
    }

    /// Get a reference to the super-increasing vector.
    pub fn secret(&self) -> &[BigUint] {
        &self.secret
    }

    /// Get a reference to the knapsack private's m.
    pub fn m(&self) -> &BigUint {
        &self.m
    }

    /// Get a reference to the knapsack private's w.
    pub fn w(&self) -> &BigUint {
        &self.w
    }

    /// Get a reference to the knapsack private's w_inv.
    pub fn w_inv(&self) -> &BigUint {
        &self.w_inv
    }

    /// Number of elements, i.e. bits per plaintext byte
    pub fn width(&self) -> usize {
        self.secret.len()
    }
}

impl KnapsackPublic {
    /// Encrypts one byte as `sum(bit_i * public[i]) mod m`
    pub fn encrypt(&self, byte: u8) -> Result<BigUint, KnapsackError> {
        let width = self.width();
        if width < 8 && (byte >> width) != 0 {
            return Err(KnapsackError::SymbolOutOfRange {
                symbol: byte.into(),
                width,
            });
        }
        let sum: BigUint = self
            .public
            .iter()
            .enumerate()
            .filter(|(i, _)| (byte >> i) & 1 == 1)
            .map(|(_, b)| b)
            .sum();
        Ok(sum % &self.m)
    }

    pub fn encrypt_all(&self, bytes: &[u8]) -> Result<Vec<BigUint>, KnapsackError> {
        bytes.iter().map(|&b| self.encrypt(b)).collect()
    }

    /// Get a reference to the public vector.
    pub fn vector(&self) -> &[BigUint] {
        &self.public
    }

    /// Get a reference to the knapsack public's m.
    pub fn m(&self) -> &BigUint {
        &self.m
    }

    /// Number of elements, i.e. bits per plaintext byte
    pub fn width(&self) -> usize {
        self.public.len()
    }
}

/// Generates a knapsack key pair of `width` elements
pub fn generate_knapsack_pair<R: Rng + ?Sized>(
    rng: &mut R,
    width: usize,
) -> Result<(KnapsackPublic, KnapsackPrivate), KnapsackGenError> {
    if width == 0 || width > MAX_WIDTH {
        return Err(KnapsackGenError::BadWidth(width));
    }

    let mut secret = Vec::with_capacity(width);
    let mut sum = BigUint::zero();
    for _ in 0..width {
        let low = &sum + 1u32;
        let high = &sum + ELEMENT_SPREAD + 1u32;
        let next = rng.gen_biguint_range(&low, &high);
        sum += &next;
        secret.push(next);
    }

    let slack = rng.gen_range(MIN_SLACK..=MAX_SLACK);
    let m = &sum + slack;

    let two = BigUint::from(2u32);
    let high = &m - 1u32;
    let mut w = None;
    for _ in 0..MAX_ATTEMPTS {
        let candidate = rng.gen_biguint_range(&two, &high);
        if gcd(&candidate, &m).is_one() {
            w = Some(candidate);
            break;
        }
    }
    let w = w.ok_or(KnapsackGenError::Exhausted(MAX_ATTEMPTS))?;

    let private = KnapsackPrivate::new(secret, m, w)?;
    let public = private.public_key();
    log::debug!("knapsack public key: {:?} mod {}", public.vector(), public.m());
    Ok((public, private))
}
