pub mod p_encrypt;

pub use p_encrypt::{p_encrypt, p_encrypt_with_r, p_encrypt_expose_r};
