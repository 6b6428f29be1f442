/// Random generation of primes with an exact bit length
pub mod gen;

/// Primitive roots modulo a prime
pub mod root;

/// Primality verification
pub mod ver;
