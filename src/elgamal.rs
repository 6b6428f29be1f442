//! ElGamal encryption over the multiplicative group of a small prime field.
//!
//! Every symbol is encrypted with its own random nonce `k`. Reusing a nonce
//! across symbols leaks the ratio of their plaintexts, so the API never takes
//! one from the caller.

use num_bigint::{BigUint, RandBigInt};
use rand::Rng;
use thiserror::Error;

use crate::{
    algo::{invmod, mod_pow},
    prime::{
        gen::{self, GenError},
        root::{find_primitive_root, is_primitive_root},
        ver::is_prime,
    },
};

pub const MIN_PRIME_SIZE: u64 = 3;
pub const MAX_PRIME_SIZE: u64 = gen::MAX_PRIME_BITS;

/// Prime size used by the default session
pub const DEFAULT_PRIME_SIZE: u64 = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElGamalError {
    #[error("symbol {symbol} doesn't fit under modulus {p}")]
    SymbolOutOfRange { symbol: BigUint, p: BigUint },

    #[error("ciphertext ({0}, {1}) can't be decoded")]
    Decode(BigUint, BigUint),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ElGamalGenError {
    #[error("prime size is too small")]
    KeyTooSmall,

    #[error("prime size is too big")]
    KeyTooBig,

    #[error("{0} has no primitive root")]
    NoPrimitiveRoot(BigUint),

    #[error("modulus {0} is not a usable prime")]
    NotPrime(BigUint),

    #[error("{g} is not a primitive root modulo {p}")]
    NotPrimitiveRoot { g: BigUint, p: BigUint },

    #[error("secret exponent must lie in [2, p - 2]")]
    BadSecret,

    #[error(transparent)]
    Generation(#[from] GenError),
}

/// ElGamal public key `(p, g, y = g^x mod p)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElGamalPublic {
    p: BigUint,
    g: BigUint,
    y: BigUint,
}

/// ElGamal private key. Keeps `p` next to the secret exponent `x`, so that
/// decryption doesn't need the public half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElGamalPrivate {
    x: BigUint,
    p: BigUint,
}

/// A ciphertext unit `(c1, c2)`, both in `[0, p)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElGamalCiphertext {
    pub c1: BigUint,
    pub c2: BigUint,
}

/// Uniform value in `[2, p - 2]`
fn random_exponent<R: Rng + ?Sized>(rng: &mut R, p: &BigUint) -> BigUint {
    rng.gen_biguint_range(&BigUint::from(2u32), &(p - 1u32))
}

impl ElGamalPublic {
    /// Encrypts a symbol with a fresh random nonce
    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        symbol: &BigUint,
    ) -> Result<ElGamalCiphertext, ElGamalError> {
        if symbol >= &self.p {
            return Err(ElGamalError::SymbolOutOfRange {
                symbol: symbol.clone(),
                p: self.p.clone(),
            });
        }
        let k = random_exponent(rng, &self.p);
        Ok(self.encrypt_with_nonce(symbol, &k))
    }

    /// Encrypts every symbol, drawing an independent nonce for each one
    pub fn encrypt_all<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        symbols: &[BigUint],
    ) -> Result<Vec<ElGamalCiphertext>, ElGamalError> {
        symbols.iter().map(|m| self.encrypt(rng, m)).collect()
    }

    fn encrypt_with_nonce(&self, symbol: &BigUint, k: &BigUint) -> ElGamalCiphertext {
        let c1 = mod_pow(&self.g, k, &self.p);
        let c2 = (symbol * mod_pow(&self.y, k, &self.p)) % &self.p;
        ElGamalCiphertext { c1, c2 }
    }

    /// Get a reference to the elgamal public's p.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Get a reference to the elgamal public's g.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Get a reference to the elgamal public's y.
    pub fn y(&self) -> &BigUint {
        &self.y
    }
}

impl ElGamalPrivate {
    /// `m = c2 * (c1^x)^-1 mod p`
    pub fn decrypt(&self, cipher: &ElGamalCiphertext) -> Result<BigUint, ElGamalError> {
        let ElGamalCiphertext { c1, c2 } = cipher;
        let decode_err = || ElGamalError::Decode(c1.clone(), c2.clone());
        if c1 >= &self.p || c2 >= &self.p {
            return Err(decode_err());
        }
        let s = mod_pow(c1, &self.x, &self.p);
        let s_inv = invmod(&s, &self.p).ok_or_else(decode_err)?;
        Ok((c2 * s_inv) % &self.p)
    }

    pub fn decrypt_all(&self, ciphers: &[ElGamalCiphertext]) -> Result<Vec<BigUint>, ElGamalError> {
        ciphers.iter().map(|c| self.decrypt(c)).collect()
    }

    /// Get a reference to the elgamal private's x.
    pub fn x(&self) -> &BigUint {
        &self.x
    }

    /// Get a reference to the elgamal private's p.
    pub fn p(&self) -> &BigUint {
        &self.p
    }
}

/// Builds a key pair from a prime, a generator and a secret exponent.
/// `p` must be a prime of at least [`MIN_PRIME_SIZE`] bits and `g` a
/// primitive root modulo `p`.
pub fn pair_from_parts(
    p: &BigUint,
    g: &BigUint,
    x: &BigUint,
) -> Result<(ElGamalPublic, ElGamalPrivate), ElGamalGenError> {
    if p.bits() < MIN_PRIME_SIZE || !is_prime(p) {
        return Err(ElGamalGenError::NotPrime(p.clone()));
    }
    if !is_primitive_root(g, p) {
        return Err(ElGamalGenError::NotPrimitiveRoot {
            g: g.clone(),
            p: p.clone(),
        });
    }
    if x < &BigUint::from(2u32) || x > &(p - 2u32) {
        return Err(ElGamalGenError::BadSecret);
    }
    let y = mod_pow(g, x, p);
    log::debug!("elgamal public key: p = {}, g = {}, y = {}", p, g, y);
    let public = ElGamalPublic {
        p: p.clone(),
        g: g.clone(),
        y,
    };
    let private = ElGamalPrivate {
        x: x.clone(),
        p: p.clone(),
    };
    Ok((public, private))
}

/// Generates ElGamal key pair over a random prime of `size` bits
pub fn generate_elgamal_pair<R: Rng + ?Sized>(
    rng: &mut R,
    size: u64,
) -> Result<(ElGamalPublic, ElGamalPrivate), ElGamalGenError> {
    if size < MIN_PRIME_SIZE {
        return Err(ElGamalGenError::KeyTooSmall);
    }
    if size > MAX_PRIME_SIZE {
        return Err(ElGamalGenError::KeyTooBig);
    }
    let p = gen::new_prime(rng, size)?;
    let g = find_primitive_root(&p).ok_or_else(|| ElGamalGenError::NoPrimitiveRoot(p.clone()))?;
    let x = random_exponent(rng, &p);
    pair_from_parts(&p, &g, &x)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::prime::root::is_primitive_root;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn known_vector() {
        let (public, private) = pair_from_parts(&big(23), &big(5), &big(6)).unwrap();
        assert_eq!(public.y(), &big(8));
        let cipher = public.encrypt_with_nonce(&big(10), &big(3));
        assert_eq!(cipher, ElGamalCiphertext { c1: big(10), c2: big(14) });
        assert_eq!(private.decrypt(&cipher).unwrap(), big(10));
    }

    #[test]
    fn generated_key_invariants() {
        let mut rng = StdRng::seed_from_u64(21);
        let (public, private) = generate_elgamal_pair(&mut rng, DEFAULT_PRIME_SIZE).unwrap();
        assert_eq!(public.p().bits(), DEFAULT_PRIME_SIZE);
        assert!(is_primitive_root(public.g(), public.p()));
        assert!(private.x() > &big(1) && private.x() < &(public.p() - 1u32));
        assert_eq!(&mod_pow(public.g(), private.x(), public.p()), public.y());
    }

    #[test]
    fn round_trip() {
        let mut rng = StdRng::seed_from_u64(8);
        for size in [MIN_PRIME_SIZE, 8, DEFAULT_PRIME_SIZE] {
            let (public, private) = generate_elgamal_pair(&mut rng, size).unwrap();
            let bound = public.p().clone();
            let symbols: Vec<BigUint> = (0u64..64).map(big).filter(|m| m < &bound).collect();
            let cipher = public.encrypt_all(&mut rng, &symbols).unwrap();
            assert_eq!(private.decrypt_all(&cipher).unwrap(), symbols);
        }
    }

    #[test]
    fn fresh_nonce_per_symbol() {
        let mut rng = StdRng::seed_from_u64(99);
        let (public, private) = generate_elgamal_pair(&mut rng, DEFAULT_PRIME_SIZE).unwrap();
        let symbols = vec![big(17); 8];
        let cipher = public.encrypt_all(&mut rng, &symbols).unwrap();
        let distinct: std::collections::HashSet<_> = cipher.iter().collect();
        assert!(distinct.len() > 1);
        for c in &cipher {
            assert_eq!(private.decrypt(c).unwrap(), big(17));
        }
    }

    #[test]
    fn symbol_out_of_range() {
        let (public, _) = pair_from_parts(&big(23), &big(5), &big(6)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            public.encrypt(&mut rng, &big(23)).unwrap_err(),
            ElGamalError::SymbolOutOfRange { symbol: big(23), p: big(23) }
        );
    }

    #[test]
    fn corrupted_ciphertext() {
        let (_, private) = pair_from_parts(&big(23), &big(5), &big(6)).unwrap();
        let zero = ElGamalCiphertext { c1: big(0), c2: big(5) };
        assert_eq!(private.decrypt(&zero).unwrap_err(), ElGamalError::Decode(big(0), big(5)));
        let wide = ElGamalCiphertext { c1: big(30), c2: big(5) };
        assert!(private.decrypt(&wide).is_err());
    }

    #[test]
    fn bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(generate_elgamal_pair(&mut rng, 2).unwrap_err(), ElGamalGenError::KeyTooSmall);
        assert_eq!(generate_elgamal_pair(&mut rng, 40).unwrap_err(), ElGamalGenError::KeyTooBig);
        assert_eq!(
            pair_from_parts(&big(23), &big(5), &big(22)).unwrap_err(),
            ElGamalGenError::BadSecret
        );
        assert_eq!(
            pair_from_parts(&big(23), &big(5), &big(1)).unwrap_err(),
            ElGamalGenError::BadSecret
        );
    }

    #[test]
    fn modulus_must_be_prime() {
        assert_eq!(
            pair_from_parts(&big(21), &big(2), &big(6)).unwrap_err(),
            ElGamalGenError::NotPrime(big(21))
        );
        // 3 is prime but too small to leave room for x in [2, p - 2]
        assert_eq!(
            pair_from_parts(&big(3), &big(2), &big(1)).unwrap_err(),
            ElGamalGenError::NotPrime(big(3))
        );
    }

    #[test]
    fn generator_must_be_primitive_root() {
        // g = p maps every ciphertext to (0, 0)
        assert_eq!(
            pair_from_parts(&big(23), &big(23), &big(6)).unwrap_err(),
            ElGamalGenError::NotPrimitiveRoot { g: big(23), p: big(23) }
        );
        // 2 has order 11 modulo 23
        assert_eq!(
            pair_from_parts(&big(23), &big(2), &big(6)).unwrap_err(),
            ElGamalGenError::NotPrimitiveRoot { g: big(2), p: big(23) }
        );
    }
}
