use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

/// Extended Euclidian algorithm. Taken directly from wikipedia
///
/// Returns `(g, x, y)` such that `a*x + b*y = g = gcd(a, b)`. For `a = 0` this
/// gives `(b, 0, 1)`.
#[allow(clippy::many_single_char_names)]
pub fn egcd(a: &BigUint, b: &BigUint) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let temp = r.clone();
        r = old_r - &q * r;
        old_r = temp;

        let temp = s.clone();
        s = old_s - &q * s;
        old_s = temp;

        let temp = t.clone();
        t = old_t - q * t;
        old_t = temp;
    }
    (old_r, old_s, old_t)
}

/// Modulo inverse. Returns None if inverse doesn't exist (`gcd(a, n) != 1`),
/// otherwise the inverse normalized to `[0, n)`.
pub fn invmod(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    if n.is_zero() {
        return None;
    }
    let (gcd, inverse, _) = egcd(a, n);
    if gcd.is_one() {
        inverse.mod_floor(&BigInt::from(n.clone())).to_biguint()
    } else {
        None
    }
}

/// Square-and-multiply modular exponentiation.
///
/// # Panic
///
/// Panics if `m` is zero.
pub fn mod_pow(base: &BigUint, exp: &BigUint, m: &BigUint) -> BigUint {
    base.modpow(exp, m)
}

pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Distinct prime factors of `n` in ascending order, found by trial division.
pub fn prime_factors(n: &BigUint) -> Vec<BigUint> {
    let mut factors = Vec::new();
    let mut rest = n.clone();
    let mut d = BigUint::from(2u32);
    while &d * &d <= rest {
        if (&rest % &d).is_zero() {
            while (&rest % &d).is_zero() {
                rest /= &d;
            }
            factors.push(d.clone());
        }
        d += 1u32;
    }
    if rest > BigUint::one() {
        factors.push(rest);
    }
    factors
}
