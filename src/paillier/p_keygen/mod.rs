pub mod p_keygen;

pub use p_keygen::{PublicKey, PrivateKey, PlainKey, CrtKey, KeyPair, p_keygen, p_keygen_from_primes};
