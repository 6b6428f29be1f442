/// Module dedicated to the modular arithmetic helpers shared by every
/// cryptosystem
pub mod algo;

/// Module dedicated to the alphabet used to turn text into symbol indices
pub mod alphabet;

/// Module dedicated to the common cryptosystem interface and the key session
pub mod cryptosystem;

/// Module dedicated to the ElGamal cryptosystem
pub mod elgamal;

/// Module dedicated to the Merkle-Hellman knapsack cryptosystem
pub mod knapsack;

/// Module dedicated to the prime number generation and verification
pub mod prime;

/// Module dedicated to the rsa utils
pub mod rsa;

/// Module dedicated to the keystream generators (LFSR and BBS)
pub mod stream;
