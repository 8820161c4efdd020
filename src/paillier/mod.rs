// Cryptosystème de Paillier : une opération par module

pub mod math;
pub mod p_keygen;
pub mod p_encrypt;
pub mod p_decrypt;
pub mod p_add;
pub mod p_mult;

// Chemins complets : `p_keygen::p_keygen` désigne aussi le fichier homonyme
pub use p_keygen::p_keygen::{PublicKey, PrivateKey, KeyPair, p_keygen, p_keygen_from_primes};
pub use p_encrypt::p_encrypt::{p_encrypt, p_encrypt_with_r, p_encrypt_expose_r};
pub use p_decrypt::p_decrypt::p_decrypt;
pub use p_add::p_add::p_add;
pub use p_mult::p_mult::p_mult;

// Paire de 256 bits construite sur deux premiers de Mersenne (2^127 − 1, 2^89 − 1)
#[cfg(test)]
pub(crate) fn test_keypair(scheme: crate::config::KeyScheme) -> KeyPair {
    use num_bigint::BigUint;
    use crate::config::PaillierConfig;
    use crate::field::{to_octet, FieldSize};

    let half = FieldSize::new(128).unwrap();
    let p = to_octet(&((BigUint::from(1u32) << 127u32) - 1u32), half).unwrap();
    let q = to_octet(&((BigUint::from(1u32) << 89u32) - 1u32), half).unwrap();
    let config = PaillierConfig { modulus_bits: 256, scheme, ..PaillierConfig::default() };
    p_keygen_from_primes(&p, &q, &config).unwrap()
}
