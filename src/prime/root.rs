use num_bigint::BigUint;
use num_traits::One;

use crate::algo::{gcd, mod_pow, prime_factors};

/// Returns true if `g` generates the multiplicative group modulo the prime `p`,
/// i.e. `g^((p-1)/q) != 1 (mod p)` for every distinct prime factor `q` of `p-1`.
pub fn is_primitive_root(g: &BigUint, p: &BigUint) -> bool {
    let one = BigUint::one();
    if p <= &one || !gcd(g, p).is_one() {
        return false;
    }
    let phi = p - 1u32;
    prime_factors(&phi)
        .iter()
        .all(|q| mod_pow(g, &(&phi / q), p) != one)
}

/// Smallest primitive root of the prime `p`, scanning `2..p`.
/// Returns `None` when the scan is exhausted, which happens for `p <= 2`.
pub fn find_primitive_root(p: &BigUint) -> Option<BigUint> {
    let mut g = BigUint::from(2u32);
    while &g < p {
        if is_primitive_root(&g, p) {
            return Some(g);
        }
        g += 1u32;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn smallest_roots() {
        let known = [(3u64, 2u64), (5, 2), (7, 3), (11, 2), (23, 5), (41, 6), (7919, 7)];
        for (p, g) in known {
            assert_eq!(find_primitive_root(&big(p)), Some(big(g)), "p = {}", p);
        }
    }

    #[test]
    fn root_generates_group() {
        for p in [13u64, 29, 101, 227] {
            let g = find_primitive_root(&big(p)).unwrap();
            let powers: HashSet<BigUint> = (1..p).map(|k| mod_pow(&g, &big(k), &big(p))).collect();
            assert_eq!(powers.len() as u64, p - 1);
        }
    }

    #[test]
    fn non_roots() {
        // 2 has order 11 modulo 23
        assert!(!is_primitive_root(&big(2), &big(23)));
        assert!(!is_primitive_root(&big(23), &big(23)));
        assert!(!is_primitive_root(&big(4), &big(7)));
    }

    #[test]
    fn no_root_for_two() {
        assert_eq!(find_primitive_root(&big(2)), None);
    }
}
