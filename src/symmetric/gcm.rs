// ============================================================================
// AES-GCM : clés de 16 ou 32 octets, IV de 12 octets, étiquette détachée
// ============================================================================

use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce, Tag};
use zeroize::Zeroizing;
use crate::crypto_error::CryptoError;
use crate::octet::Octet;

pub const GCM_IV_LEN: usize = 12;
pub const GCM_TAG_LEN: usize = 16;

fn check_iv(iv: &Octet) -> Result<(), CryptoError> {
    if iv.len() != GCM_IV_LEN {
        return Err(CryptoError::InvalidLength { what: "IV AES-GCM", actual: iv.len() });
    }
    Ok(())
}

fn bad_key(key: &Octet) -> CryptoError {
    CryptoError::InvalidLength { what: "clé AES-GCM", actual: key.len() }
}

/// Chiffre `pt` et authentifie `header` ; rend (chiffré, étiquette)
pub fn gcm_encrypt(
    key: &Octet,
    iv: &Octet,
    header: &Octet,
    pt: &Octet,
) -> Result<(Octet, Octet), CryptoError> {
    check_iv(iv)?;
    let nonce = Nonce::from_slice(iv.as_bytes());
    let aad = header.as_bytes();
    let mut buf = Zeroizing::new(pt.as_bytes().to_vec());

    let tag = match key.len() {
        16 => Aes128Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .encrypt_in_place_detached(nonce, aad, &mut buf),
        32 => Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .encrypt_in_place_detached(nonce, aad, &mut buf),
        _ => return Err(bad_key(key)),
    }
    .map_err(|_| CryptoError::InvalidInput("chiffrement AES-GCM impossible".into()))?;

    Ok((Octet::from_bytes(&buf), Octet::from_bytes(tag.as_slice())))
}

/// Vérifie l'étiquette puis déchiffre ; aucun clair n'est rendu si elle est fausse
pub fn gcm_decrypt(
    key: &Octet,
    iv: &Octet,
    header: &Octet,
    ct: &Octet,
    tag: &Octet,
) -> Result<Octet, CryptoError> {
    check_iv(iv)?;
    if tag.len() != GCM_TAG_LEN {
        return Err(CryptoError::InvalidLength { what: "étiquette AES-GCM", actual: tag.len() });
    }
    let nonce = Nonce::from_slice(iv.as_bytes());
    let tag = Tag::from_slice(tag.as_bytes());
    let aad = header.as_bytes();
    let mut buf = Zeroizing::new(ct.as_bytes().to_vec());

    let verified = match key.len() {
        16 => Aes128Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .decrypt_in_place_detached(nonce, aad, &mut buf, tag),
        32 => Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|_| bad_key(key))?
            .decrypt_in_place_detached(nonce, aad, &mut buf, tag),
        _ => return Err(bad_key(key)),
    };
    verified.map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(Octet::from_bytes(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Octet, Octet, Octet, Octet) {
        (
            Octet::from_bytes(&[0x11u8; 32]),
            Octet::from_bytes(&[0x22u8; 12]),
            Octet::from_bytes(b"en-tete"),
            Octet::from_bytes(b"texte clair de longueur quelconque"),
        )
    }

    #[test]
    fn test_round_trip_256() {
        let (key, iv, hdr, pt) = sample();
        let (ct, tag) = gcm_encrypt(&key, &iv, &hdr, &pt).unwrap();
        assert_eq!(ct.len(), pt.len());
        assert_eq!(tag.len(), GCM_TAG_LEN);
        assert_eq!(gcm_decrypt(&key, &iv, &hdr, &ct, &tag).unwrap(), pt);
    }

    #[test]
    fn test_tampering_detected() {
        let (key, iv, hdr, pt) = sample();
        let (ct, tag) = gcm_encrypt(&key, &iv, &hdr, &pt).unwrap();

        let mut bad_ct = ct.clone();
        bad_ct.xor_byte(0x80);
        assert_eq!(gcm_decrypt(&key, &iv, &hdr, &bad_ct, &tag), Err(CryptoError::AuthenticationFailed));

        let other_hdr = Octet::from_bytes(b"autre");
        assert_eq!(gcm_decrypt(&key, &iv, &other_hdr, &ct, &tag), Err(CryptoError::AuthenticationFailed));

        let mut bad_tag = tag.clone();
        bad_tag.xor_byte(1);
        assert_eq!(gcm_decrypt(&key, &iv, &hdr, &ct, &bad_tag), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn test_length_checks() {
        let (_, iv, hdr, pt) = sample();
        let key24 = Octet::from_bytes(&[0u8; 24]);
        assert!(matches!(
            gcm_encrypt(&key24, &iv, &hdr, &pt),
            Err(CryptoError::InvalidLength { actual: 24, .. })
        ));
        let key16 = Octet::from_bytes(&[0u8; 16]);
        let iv8 = Octet::from_bytes(&[0u8; 8]);
        assert!(matches!(
            gcm_encrypt(&key16, &iv8, &hdr, &pt),
            Err(CryptoError::InvalidLength { actual: 8, .. })
        ));
    }
}
