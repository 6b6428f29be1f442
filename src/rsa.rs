use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use thiserror::Error;

use crate::{
    algo::{gcd, invmod, mod_pow},
    prime::{
        gen::{self, GenError},
        ver::is_prime,
    },
};

pub const MIN_PRIME_SIZE: u64 = 4;
pub const MAX_PRIME_SIZE: u64 = gen::MAX_PRIME_BITS;

/// Prime size used by the default session
pub const DEFAULT_PRIME_SIZE: u64 = 8;

/// First candidate of the public exponent search
const FIRST_EXP: u32 = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsaError {
    #[error("symbol {symbol} doesn't fit under modulus {n}")]
    SymbolOutOfRange { symbol: BigUint, n: BigUint },

    #[error("ciphertext {0} is larger than modulus")]
    CipherOutOfRange(BigUint),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsaGenError {
    #[error("prime size is too small")]
    KeyTooSmall,

    #[error("prime size is too big")]
    KeyTooBig,

    #[error("p and q must be distinct")]
    EqualPrimes,

    #[error("{0} is not prime")]
    NotPrime(BigUint),

    #[error("no public exponent is coprime with phi = {0}")]
    NoExponent(BigUint),

    #[error("exponent has no inverse modulo phi")]
    NoInverse,

    #[error(transparent)]
    Generation(#[from] GenError),
}

/// Rsa private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivate {
    d: BigUint,
    n: BigUint,
    p: BigUint,
    q: BigUint,
}

/// Rsa public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublic {
    e: BigUint,
    n: BigUint,
}

impl RsaPrivate {
    /// Decrypts a single ciphertext unit: `c^d mod n`
    pub fn decrypt(&self, cipher: &BigUint) -> Result<BigUint, RsaError> {
        if cipher >= &self.n {
            return Err(RsaError::CipherOutOfRange(cipher.clone()));
        }
        Ok(mod_pow(cipher, &self.d, &self.n))
    }

    pub fn decrypt_all(&self, ciphers: &[BigUint]) -> Result<Vec<BigUint>, RsaError> {
        ciphers.iter().map(|c| self.decrypt(c)).collect()
    }

    /// Get a reference to the rsa private's n.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Get a reference to the rsa private's d.
    pub fn d(&self) -> &BigUint {
        &self.d
    }

    /// Prime factors `(p, q)` of the modulus
    pub fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    /// Euler's totient `(p-1)(q-1)`
    pub fn phi(&self) -> BigUint {
        totient(&self.p, &self.q)
    }
}

impl RsaPublic {
    pub fn new(e: BigUint, n: BigUint) -> Self {
        Self { e, n }
    }

    /// Encrypts a single symbol: `m^e mod n`. Symbols are encrypted
    /// independently, without padding or chaining.
    pub fn encrypt(&self, symbol: &BigUint) -> Result<BigUint, RsaError> {
        if symbol >= &self.n {
            return Err(RsaError::SymbolOutOfRange {
                symbol: symbol.clone(),
                n: self.n.clone(),
            });
        }
        Ok(mod_pow(symbol, &self.e, &self.n))
    }

    pub fn encrypt_all(&self, symbols: &[BigUint]) -> Result<Vec<BigUint>, RsaError> {
        symbols.iter().map(|m| self.encrypt(m)).collect()
    }

    /// Get a reference to the rsa public's e.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Get a reference to the rsa public's n.
    pub fn n(&self) -> &BigUint {
        &self.n
    }
}

fn check_primes(p: &BigUint, q: &BigUint) -> Result<(), RsaGenError> {
    for f in [p, q] {
        if !is_prime(f) {
            return Err(RsaGenError::NotPrime(f.clone()));
        }
    }
    if p == q {
        return Err(RsaGenError::EqualPrimes);
    }
    Ok(())
}

fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u32) * (q - 1u32)
}

/// Smallest odd `e >= 3` with `gcd(e, phi) = 1`
fn smallest_exponent(phi: &BigUint) -> Option<BigUint> {
    let mut e = BigUint::from(FIRST_EXP);
    while &e < phi {
        if gcd(&e, phi).is_one() {
            return Some(e);
        }
        e += 2u32;
    }
    None
}

/// Builds a key pair from two primes and an explicit public exponent
#[allow(clippy::many_single_char_names)]
pub fn pair_from_exponent(
    p: &BigUint,
    q: &BigUint,
    e: &BigUint,
) -> Result<(RsaPublic, RsaPrivate), RsaGenError> {
    check_primes(p, q)?;
    let n = p * q;
    let phi = totient(p, q);
    let d = invmod(e, &phi).ok_or(RsaGenError::NoInverse)?;
    log::debug!("rsa public key: e = {}, n = {}", e, n);
    let public = RsaPublic {
        e: e.clone(),
        n: n.clone(),
    };
    let private = RsaPrivate {
        d,
        n,
        p: p.clone(),
        q: q.clone(),
    };
    Ok((public, private))
}

/// Builds a key pair from two primes, picking the smallest suitable exponent
pub fn pair_from_primes(p: &BigUint, q: &BigUint) -> Result<(RsaPublic, RsaPrivate), RsaGenError> {
    check_primes(p, q)?;
    let phi = totient(p, q);
    let e = smallest_exponent(&phi).ok_or_else(|| RsaGenError::NoExponent(phi.clone()))?;
    pair_from_exponent(p, q, &e)
}

/// Generates RSA key pair from two distinct primes of `size` bits each
pub fn generate_rsa_pair<R: Rng + ?Sized>(
    rng: &mut R,
    size: u64,
) -> Result<(RsaPublic, RsaPrivate), RsaGenError> {
    if size < MIN_PRIME_SIZE {
        return Err(RsaGenError::KeyTooSmall);
    }
    if size > MAX_PRIME_SIZE {
        return Err(RsaGenError::KeyTooBig);
    }
    let (p, q) = gen_prime_pair(rng, size)?;
    pair_from_primes(&p, &q)
}

fn gen_prime_pair<R: Rng + ?Sized>(rng: &mut R, size: u64) -> Result<(BigUint, BigUint), GenError> {
    let p = gen::new_prime(rng, size)?;
    let attempts = gen::max_attempts(size);
    for _ in 0..attempts {
        let q = gen::new_prime(rng, size)?;
        if p != q {
            return Ok((p, q));
        }
    }
    Err(GenError::Exhausted(attempts))
}
