// ============================================================================
// HKDF-SHA256 (RFC 5869)
//
// extract : IKM non vide, sel absent/vide (sel nul) ou d'au moins 32 octets
// expand  : PRK de 32 octets, sortie d'au plus 255 · 32 octets
// ============================================================================

use ::hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;
use crate::crypto_error::CryptoError;
use crate::octet::Octet;
use super::hmac::SHA256_LEN;

pub const HKDF_MAX_OUTPUT: usize = 255 * SHA256_LEN;

pub fn hkdf_sha256_extract(salt: Option<&Octet>, ikm: &Octet) -> Result<Octet, CryptoError> {
    if ikm.is_empty() {
        return Err(CryptoError::InvalidLength { what: "IKM HKDF", actual: 0 });
    }
    let salt = match salt {
        Some(s) if !s.is_empty() => {
            if s.len() < SHA256_LEN {
                return Err(CryptoError::InvalidLength { what: "sel HKDF", actual: s.len() });
            }
            Some(s.as_bytes())
        }
        _ => None,
    };
    let (prk, _) = Hkdf::<Sha256>::extract(salt, ikm.as_bytes());
    Ok(Octet::from_bytes(&prk))
}

pub fn hkdf_sha256_expand(prk: &Octet, info: &Octet, olen: usize) -> Result<Octet, CryptoError> {
    if prk.len() != SHA256_LEN {
        return Err(CryptoError::InvalidLength { what: "PRK HKDF", actual: prk.len() });
    }
    if olen == 0 || olen > HKDF_MAX_OUTPUT {
        return Err(CryptoError::InvalidLength { what: "sortie HKDF", actual: olen });
    }
    let hk = Hkdf::<Sha256>::from_prk(prk.as_bytes())
        .map_err(|_| CryptoError::InvalidLength { what: "PRK HKDF", actual: prk.len() })?;

    let mut okm = Zeroizing::new(vec![0u8; olen]);
    hk.expand(info.as_bytes(), &mut okm)
        .map_err(|_| CryptoError::InvalidLength { what: "sortie HKDF", actual: olen })?;
    Ok(Octet::from_bytes(&okm))
}
