// Primitives symétriques au niveau Octet : HMAC-SHA256, HKDF-SHA256, AES-GCM

pub mod hmac;
pub mod hkdf;
pub mod gcm;

pub use self::hmac::{hmac_sha256, HmacSha256, SHA256_LEN, MIN_HMAC_KEY_LEN};
pub use self::hkdf::{hkdf_sha256_extract, hkdf_sha256_expand, HKDF_MAX_OUTPUT};
pub use self::gcm::{gcm_encrypt, gcm_decrypt, GCM_IV_LEN, GCM_TAG_LEN};
