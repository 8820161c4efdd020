// ============================================================================
// HMAC-SHA256 (FIPS 198-1)
//
// Clé d'au moins 32 octets ; l'étiquette peut être tronquée à 1..=32 octets.
// ============================================================================

use ::hmac::{Hmac, Mac};
use sha2::Sha256;
use crate::crypto_error::CryptoError;
use crate::octet::Octet;

pub const SHA256_LEN: usize = 32;
pub const MIN_HMAC_KEY_LEN: usize = 32;

/// Contexte HMAC incrémental
pub struct HmacSha256 {
    mac: Hmac<Sha256>,
}

impl HmacSha256 {
    pub fn new(key: &Octet) -> Result<Self, CryptoError> {
        if key.len() < MIN_HMAC_KEY_LEN {
            return Err(CryptoError::InvalidLength { what: "clé HMAC", actual: key.len() });
        }
        let mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
            .map_err(|_| CryptoError::InvalidLength { what: "clé HMAC", actual: key.len() })?;
        Ok(HmacSha256 { mac })
    }

    pub fn update(&mut self, data: &Octet) {
        self.mac.update(data.as_bytes());
    }

    pub fn update_bytes(&mut self, data: &[u8]) {
        self.mac.update(data);
    }

    /// Rend les `olen` premiers octets de l'étiquette
    pub fn finalize(self, olen: usize) -> Result<Octet, CryptoError> {
        if olen == 0 || olen > SHA256_LEN {
            return Err(CryptoError::InvalidLength { what: "sortie HMAC", actual: olen });
        }
        let tag = self.mac.finalize().into_bytes();
        Ok(Octet::from_bytes(&tag[..olen]))
    }

    /// Compare l'étiquette calculée à `expected` en temps constant
    pub fn verify(self, expected: &Octet) -> Result<bool, CryptoError> {
        let tag = self.finalize(expected.len())?;
        Ok(tag.ct_eq(expected))
    }
}

pub fn hmac_sha256(key: &Octet, msg: &Octet, olen: usize) -> Result<Octet, CryptoError> {
    let mut mac = HmacSha256::new(key)?;
    mac.update(msg);
    mac.finalize(olen)
}
