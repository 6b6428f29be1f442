//! Common capability of the three public-key systems and a session object
//! holding the active key pair.
//!
//! # Usage
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use toy_pkc::{
//!     alphabet::RUSSIAN,
//!     cryptosystem::{Algorithm, Session, SessionConfig},
//! };
//!
//! let mut rng = StdRng::seed_from_u64(2025);
//! let mut session = Session::new(SessionConfig::default());
//!
//! let symbols: Vec<u64> = RUSSIAN
//!     .to_indices("шифр")
//!     .into_iter()
//!     .map(|i| i as u64)
//!     .collect();
//!
//! for algorithm in [Algorithm::Rsa, Algorithm::Knapsack, Algorithm::ElGamal] {
//!     session.generate(&mut rng, algorithm).unwrap();
//!     let encrypted = session.encrypt(&mut rng, &symbols).unwrap();
//!     let decrypted = session.decrypt(&encrypted).unwrap();
//!     assert_eq!(decrypted, symbols);
//! }
//! ```

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rand::Rng;
use thiserror::Error;

use crate::{
    elgamal::{self, ElGamalCiphertext, ElGamalError, ElGamalGenError, ElGamalPrivate, ElGamalPublic},
    knapsack::{self, KnapsackError, KnapsackGenError, KnapsackPrivate, KnapsackPublic},
    prime::gen::GenError,
    rsa::{self, RsaError, RsaGenError, RsaPrivate, RsaPublic},
};

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("no key pair has been generated")]
    NoKeys,

    #[error("{found:?} ciphertext can't be decrypted with {expected:?} keys")]
    AlgorithmMismatch { expected: Algorithm, found: Algorithm },

    #[error("decrypted value {0} doesn't fit into a symbol")]
    SymbolOverflow(BigUint),

    #[error(transparent)]
    Rsa(#[from] RsaError),

    #[error(transparent)]
    RsaGen(#[from] RsaGenError),

    #[error(transparent)]
    Knapsack(#[from] KnapsackError),

    #[error(transparent)]
    KnapsackGen(#[from] KnapsackGenError),

    #[error(transparent)]
    ElGamal(#[from] ElGamalError),

    #[error(transparent)]
    ElGamalGen(#[from] ElGamalGenError),
}

/// Coarse classification of [`CryptoError`], for callers that only branch on
/// what went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Key or prime generation didn't converge
    Generation,
    /// A plaintext symbol doesn't fit under the modulus
    EncodingRange,
    /// A required modular inverse doesn't exist
    NoInverse,
    /// A ciphertext failed a consistency check
    Decode,
    /// Unsupported sizes or inconsistent key parts
    InvalidParameters,
    /// The session was used in the wrong state
    Usage,
}

fn gen_kind(err: &GenError) -> ErrorKind {
    match err {
        GenError::BadSize(_) => ErrorKind::InvalidParameters,
        GenError::Exhausted(_) => ErrorKind::Generation,
    }
}

impl CryptoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoKeys | Self::AlgorithmMismatch { .. } => ErrorKind::Usage,
            Self::SymbolOverflow(_) => ErrorKind::Decode,
            Self::Rsa(RsaError::SymbolOutOfRange { .. }) => ErrorKind::EncodingRange,
            Self::Rsa(RsaError::CipherOutOfRange(_)) => ErrorKind::Decode,
            Self::RsaGen(RsaGenError::NoInverse) => ErrorKind::NoInverse,
            Self::RsaGen(RsaGenError::NoExponent(_)) => ErrorKind::Generation,
            Self::RsaGen(RsaGenError::Generation(e)) => gen_kind(e),
            Self::RsaGen(_) => ErrorKind::InvalidParameters,
            Self::Knapsack(KnapsackError::SymbolOutOfRange { .. }) => ErrorKind::EncodingRange,
            Self::Knapsack(KnapsackError::Decode(_)) => ErrorKind::Decode,
            Self::KnapsackGen(KnapsackGenError::NoInverse) => ErrorKind::NoInverse,
            Self::KnapsackGen(KnapsackGenError::Exhausted(_)) => ErrorKind::Generation,
            Self::KnapsackGen(_) => ErrorKind::InvalidParameters,
            Self::ElGamal(ElGamalError::SymbolOutOfRange { .. }) => ErrorKind::EncodingRange,
            Self::ElGamal(ElGamalError::Decode(..)) => ErrorKind::Decode,
            Self::ElGamalGen(ElGamalGenError::NoPrimitiveRoot(_)) => ErrorKind::Generation,
            Self::ElGamalGen(ElGamalGenError::Generation(e)) => gen_kind(e),
            Self::ElGamalGen(_) => ErrorKind::InvalidParameters,
        }
    }
}

/// Key sizes used by a [`Session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bits of each of the RSA primes `p` and `q`
    pub rsa_prime_bits: u64,
    /// Number of knapsack elements, i.e. bits per plaintext byte
    pub knapsack_width: usize,
    /// Bits of the ElGamal prime `p`
    pub elgamal_prime_bits: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rsa_prime_bits: rsa::DEFAULT_PRIME_SIZE,
            knapsack_width: knapsack::DEFAULT_WIDTH,
            elgamal_prime_bits: elgamal::DEFAULT_PRIME_SIZE,
        }
    }
}

/// Key generation, encryption and decryption of a single plaintext unit
pub trait Cryptosystem {
    type Public;
    type Private;
    type Plain;
    type Cipher;

    fn generate_keys<R: Rng + ?Sized>(
        rng: &mut R,
        config: &SessionConfig,
    ) -> Result<(Self::Public, Self::Private), CryptoError>;

    fn encrypt<R: Rng + ?Sized>(
        rng: &mut R,
        public: &Self::Public,
        plain: &Self::Plain,
    ) -> Result<Self::Cipher, CryptoError>;

    fn decrypt(private: &Self::Private, cipher: &Self::Cipher) -> Result<Self::Plain, CryptoError>;
}

pub struct Rsa;
pub struct Knapsack;
pub struct ElGamal;

impl Cryptosystem for Rsa {
    type Public = RsaPublic;
    type Private = RsaPrivate;
    type Plain = BigUint;
    type Cipher = BigUint;

    fn generate_keys<R: Rng + ?Sized>(
        rng: &mut R,
        config: &SessionConfig,
    ) -> Result<(RsaPublic, RsaPrivate), CryptoError> {
        Ok(rsa::generate_rsa_pair(rng, config.rsa_prime_bits)?)
    }

    fn encrypt<R: Rng + ?Sized>(
        _rng: &mut R,
        public: &RsaPublic,
        plain: &BigUint,
    ) -> Result<BigUint, CryptoError> {
        Ok(public.encrypt(plain)?)
    }

    fn decrypt(private: &RsaPrivate, cipher: &BigUint) -> Result<BigUint, CryptoError> {
        Ok(private.decrypt(cipher)?)
    }
}

impl Cryptosystem for Knapsack {
    type Public = KnapsackPublic;
    type Private = KnapsackPrivate;
    type Plain = u8;
    type Cipher = BigUint;

    fn generate_keys<R: Rng + ?Sized>(
        rng: &mut R,
        config: &SessionConfig,
    ) -> Result<(KnapsackPublic, KnapsackPrivate), CryptoError> {
        Ok(knapsack::generate_knapsack_pair(rng, config.knapsack_width)?)
    }

    fn encrypt<R: Rng + ?Sized>(
        _rng: &mut R,
        public: &KnapsackPublic,
        plain: &u8,
    ) -> Result<BigUint, CryptoError> {
        Ok(public.encrypt(*plain)?)
    }

    fn decrypt(private: &KnapsackPrivate, cipher: &BigUint) -> Result<u8, CryptoError> {
        Ok(private.decrypt(cipher)?)
    }
}

impl Cryptosystem for ElGamal {
    type Public = ElGamalPublic;
    type Private = ElGamalPrivate;
    type Plain = BigUint;
    type Cipher = ElGamalCiphertext;

    fn generate_keys<R: Rng + ?Sized>(
        rng: &mut R,
        config: &SessionConfig,
    ) -> Result<(ElGamalPublic, ElGamalPrivate), CryptoError> {
        Ok(elgamal::generate_elgamal_pair(rng, config.elgamal_prime_bits)?)
    }

    fn encrypt<R: Rng + ?Sized>(
        rng: &mut R,
        public: &ElGamalPublic,
        plain: &BigUint,
    ) -> Result<ElGamalCiphertext, CryptoError> {
        Ok(public.encrypt(rng, plain)?)
    }

    fn decrypt(private: &ElGamalPrivate, cipher: &ElGamalCiphertext) -> Result<BigUint, CryptoError> {
        Ok(private.decrypt(cipher)?)
    }
}

/// Selector of a cryptosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Rsa,
    Knapsack,
    ElGamal,
}

/// A generated key pair of one of the supported systems
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPair {
    Rsa(RsaPublic, RsaPrivate),
    Knapsack(KnapsackPublic, KnapsackPrivate),
    ElGamal(ElGamalPublic, ElGamalPrivate),
}

/// One ciphertext unit, tagged with the system that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ciphertext {
    Rsa(BigUint),
    Knapsack(BigUint),
    ElGamal(ElGamalCiphertext),
}

impl Ciphertext {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Ciphertext::Rsa(_) => Algorithm::Rsa,
            Ciphertext::Knapsack(_) => Algorithm::Knapsack,
            Ciphertext::ElGamal(_) => Algorithm::ElGamal,
        }
    }
}

fn to_symbol(value: BigUint) -> Result<u64, CryptoError> {
    value.to_u64().ok_or(CryptoError::SymbolOverflow(value))
}

impl KeyPair {
    pub fn generate<R: Rng + ?Sized>(
        rng: &mut R,
        algorithm: Algorithm,
        config: &SessionConfig,
    ) -> Result<Self, CryptoError> {
        let pair = match algorithm {
            Algorithm::Rsa => {
                let (public, private) = Rsa::generate_keys(rng, config)?;
                KeyPair::Rsa(public, private)
            }
            Algorithm::Knapsack => {
                let (public, private) = Knapsack::generate_keys(rng, config)?;
                KeyPair::Knapsack(public, private)
            }
            Algorithm::ElGamal => {
                let (public, private) = ElGamal::generate_keys(rng, config)?;
                KeyPair::ElGamal(public, private)
            }
        };
        Ok(pair)
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            KeyPair::Rsa(..) => Algorithm::Rsa,
            KeyPair::Knapsack(..) => Algorithm::Knapsack,
            KeyPair::ElGamal(..) => Algorithm::ElGamal,
        }
    }

    pub fn encrypt<R: Rng + ?Sized>(&self, rng: &mut R, symbol: u64) -> Result<Ciphertext, CryptoError> {
        match self {
            KeyPair::Rsa(public, _) => Rsa::encrypt(rng, public, &symbol.into()).map(Ciphertext::Rsa),
            KeyPair::Knapsack(public, _) => {
                let byte = u8::try_from(symbol).map_err(|_| KnapsackError::SymbolOutOfRange {
                    symbol,
                    width: public.width(),
                })?;
                Knapsack::encrypt(rng, public, &byte).map(Ciphertext::Knapsack)
            }
            KeyPair::ElGamal(public, _) => {
                ElGamal::encrypt(rng, public, &symbol.into()).map(Ciphertext::ElGamal)
            }
        }
    }

    pub fn decrypt(&self, cipher: &Ciphertext) -> Result<u64, CryptoError> {
        match (self, cipher) {
            (KeyPair::Rsa(_, private), Ciphertext::Rsa(c)) => to_symbol(Rsa::decrypt(private, c)?),
            (KeyPair::Knapsack(_, private), Ciphertext::Knapsack(c)) => {
                Knapsack::decrypt(private, c).map(u64::from)
            }
            (KeyPair::ElGamal(_, private), Ciphertext::ElGamal(c)) => {
                to_symbol(ElGamal::decrypt(private, c)?)
            }
            (pair, cipher) => Err(CryptoError::AlgorithmMismatch {
                expected: pair.algorithm(),
                found: cipher.algorithm(),
            }),
        }
    }
}

/// Holds the active key pair. Generating keys replaces the previous pair.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: SessionConfig,
    keys: Option<KeyPair>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config, keys: None }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn keys(&self) -> Option<&KeyPair> {
        self.keys.as_ref()
    }

    /// Generates a fresh key pair for `algorithm` and makes it active
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        algorithm: Algorithm,
    ) -> Result<&KeyPair, CryptoError> {
        let pair = KeyPair::generate(rng, algorithm, &self.config)?;
        log::debug!("session switched to {:?} keys", algorithm);
        Ok(&*self.keys.insert(pair))
    }

    /// Makes an externally built key pair active
    pub fn install(&mut self, keys: KeyPair) -> &KeyPair {
        log::debug!("session switched to installed {:?} keys", keys.algorithm());
        self.keys.insert(keys)
    }

    /// Drops the active key pair
    pub fn clear(&mut self) {
        self.keys = None;
    }

    fn active(&self) -> Result<&KeyPair, CryptoError> {
        self.keys.as_ref().ok_or(CryptoError::NoKeys)
    }

    /// Encrypts every symbol independently with the active public key
    pub fn encrypt<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        symbols: &[u64],
    ) -> Result<Vec<Ciphertext>, CryptoError> {
        let keys = self.active()?;
        symbols.iter().map(|&s| keys.encrypt(rng, s)).collect()
    }

    pub fn decrypt(&self, ciphers: &[Ciphertext]) -> Result<Vec<u64>, CryptoError> {
        let keys = self.active()?;
        ciphers.iter().map(|c| keys.decrypt(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    const ALL: [Algorithm; 3] = [Algorithm::Rsa, Algorithm::Knapsack, Algorithm::ElGamal];

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn round_trip_all_systems() {
        init();
        let mut rng = StdRng::seed_from_u64(31);
        let mut session = Session::new(SessionConfig::default());
        let symbols: Vec<u64> = (0..=255).collect();
        for algorithm in ALL {
            let keys = session.generate(&mut rng, algorithm).unwrap();
            assert_eq!(keys.algorithm(), algorithm);
            let encrypted = session.encrypt(&mut rng, &symbols).unwrap();
            assert!(encrypted.iter().all(|c| c.algorithm() == algorithm));
            assert_eq!(session.decrypt(&encrypted).unwrap(), symbols);
        }
    }

    #[test]
    fn no_keys() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut session = Session::default();
        let err = session.encrypt(&mut rng, &[1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);

        session.generate(&mut rng, Algorithm::Knapsack).unwrap();
        session.clear();
        assert!(matches!(session.decrypt(&[]), Err(CryptoError::NoKeys)));
    }

    #[test]
    fn regenerating_replaces_keys() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = Session::default();
        let first = session.generate(&mut rng, Algorithm::Rsa).unwrap().clone();
        let second = session.generate(&mut rng, Algorithm::Rsa).unwrap().clone();
        assert_ne!(first, second);
        assert_eq!(session.keys(), Some(&second));
    }

    #[test]
    fn mismatched_ciphertext() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = Session::default();
        session.generate(&mut rng, Algorithm::Rsa).unwrap();
        let encrypted = session.encrypt(&mut rng, &[5]).unwrap();

        session.generate(&mut rng, Algorithm::ElGamal).unwrap();
        match session.decrypt(&encrypted).unwrap_err() {
            CryptoError::AlgorithmMismatch { expected, found } => {
                assert_eq!(expected, Algorithm::ElGamal);
                assert_eq!(found, Algorithm::Rsa);
            }
            e => panic!("unexpected error {}", e),
        }
    }

    #[test]
    fn range_errors() {
        let mut rng = StdRng::seed_from_u64(12);
        let config = SessionConfig {
            knapsack_width: 4,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config);

        session.generate(&mut rng, Algorithm::Knapsack).unwrap();
        let err = session.encrypt(&mut rng, &[300]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingRange);
        let err = session.encrypt(&mut rng, &[16]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingRange);

        session.generate(&mut rng, Algorithm::Rsa).unwrap();
        let err = session.encrypt(&mut rng, &[u64::MAX]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingRange);
    }

    #[test]
    fn corrupted_knapsack_ciphertext() {
        let big = |n: u32| BigUint::from(n);
        let secret = [2u32, 3, 7, 14, 30, 57, 120, 251].iter().map(|&a| big(a)).collect();
        let private = KnapsackPrivate::new(secret, big(491), big(41)).unwrap();
        let mut session = Session::default();
        session.install(KeyPair::Knapsack(private.public_key(), private));

        // 41 maps to c' = 1, below the smallest element
        let err = session.decrypt(&[Ciphertext::Knapsack(big(41))]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(session.decrypt(&[Ciphertext::Knapsack(big(92))]).unwrap(), vec![65]);
    }

    #[test]
    fn exhausted_search_is_a_generation_error() {
        let err = CryptoError::from(RsaGenError::Generation(GenError::Exhausted(7)));
        assert_eq!(err.kind(), ErrorKind::Generation);
        let err = CryptoError::from(ElGamalGenError::Generation(GenError::Exhausted(7)));
        assert_eq!(err.kind(), ErrorKind::Generation);
        let err = CryptoError::from(KnapsackGenError::Exhausted(7));
        assert_eq!(err.kind(), ErrorKind::Generation);
        let err = CryptoError::from(RsaGenError::Generation(GenError::BadSize(1)));
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }

    #[test]
    fn invalid_key_parts() {
        let big = |n: u32| BigUint::from(n);
        let err = rsa::pair_from_primes(&big(9), &big(5)).unwrap_err();
        assert_eq!(CryptoError::from(err).kind(), ErrorKind::InvalidParameters);
        let err = elgamal::pair_from_parts(&big(23), &big(23), &big(6)).unwrap_err();
        let err = CryptoError::from(err);
        assert_eq!(err.kind(), ErrorKind::InvalidParameters);
    }

    #[test]
    fn invalid_config() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = SessionConfig {
            rsa_prime_bits: 2,
            knapsack_width: 0,
            elgamal_prime_bits: 64,
        };
        let mut session = Session::new(config);
        for algorithm in ALL {
            let err = session.generate(&mut rng, algorithm).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameters);
        }
        assert!(session.keys().is_none());
    }

    #[test]
    fn trait_dispatch() {
        let mut rng = StdRng::seed_from_u64(10);
        let config = SessionConfig::default();
        let (public, private) = ElGamal::generate_keys(&mut rng, &config).unwrap();
        let plain = BigUint::from(42u32);
        let c = ElGamal::encrypt(&mut rng, &public, &plain).unwrap();
        assert_eq!(ElGamal::decrypt(&private, &c).unwrap(), plain);
    }
}
