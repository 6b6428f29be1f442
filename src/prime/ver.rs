use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

/// Deterministic primality test by trial division up to `floor(sqrt(n))`,
/// skipping even divisors. Only meant for the small moduli used in this crate.
pub fn is_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    if n == &two {
        return true;
    }
    if n.is_even() {
        return false;
    }
    let limit = n.sqrt();
    let mut d = BigUint::from(3u32);
    while d <= limit {
        if (n % &d).is_zero() {
            return false;
        }
        d += 2u32;
    }
    true
}
