use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use super::{Keystream, StreamError};
use crate::prime::{
    gen::{self, GenError},
    ver::is_prime,
};

/// Blum-Blum-Shub generator over `n = p*q`. Each step squares the state
/// modulo `n` and emits the parity of the new state.
#[derive(Debug, Clone)]
pub struct Bbs {
    state: BigUint,
    n: BigUint,
}

fn check_blum(p: &BigUint) -> Result<(), StreamError> {
    if is_prime(p) && p.mod_floor(&BigUint::from(4u32)) == BigUint::from(3u32) {
        Ok(())
    } else {
        Err(StreamError::NotBlumPrime(p.clone()))
    }
}

impl Bbs {
    /// Creates the generator from `seed` and two primes congruent to 3 mod 4.
    /// The seed is reduced modulo `n`. A seed that reduces to zero is
    /// replaced with 1.
    pub fn new(seed: &BigUint, p: &BigUint, q: &BigUint) -> Result<Self, StreamError> {
        check_blum(p)?;
        check_blum(q)?;
        let n = p * q;
        let mut state = seed % &n;
        if state.is_zero() {
            log::warn!("BBS seed is 0 mod {}, replaced with 1", n);
            state = BigUint::one();
        }
        Ok(Self { state, n })
    }

    /// Generator over two distinct random Blum primes of `bits` bits each
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bits: u64, seed: &BigUint) -> Result<Self, GenError> {
        let p = gen::new_blum_prime(rng, bits)?;
        let attempts = gen::max_attempts(bits);
        for _ in 0..attempts {
            let q = gen::new_blum_prime(rng, bits)?;
            if q != p {
                log::debug!("BBS modulus {} = {} * {}", &p * &q, p, q);
                return Ok(Self::new(seed, &p, &q).expect("generated primes are Blum primes"));
            }
        }
        Err(GenError::Exhausted(attempts))
    }

    /// Current residue `x_i`
    pub fn state(&self) -> &BigUint {
        &self.state
    }

    pub fn modulus(&self) -> &BigUint {
        &self.n
    }
}

impl Keystream for Bbs {
    fn next_bit(&mut self) -> u8 {
        self.state = (&self.state * &self.state) % &self.n;
        u8::from(self.state.is_odd())
    }
}
