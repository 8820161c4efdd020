use num_bigint::BigUint;
use zeroize::Zeroizing;
use crate::crypto_error::CryptoError;
use crate::field::field_size::FieldSize;
use crate::octet::Octet;

// ============================================================================
// Passage BigUint ↔ Octet à largeur fixe, big-endian (poids fort en tête)
//
// Une valeur sérialisée à la largeur W occupe exactement W/8 octets,
// alignée à droite et complétée par des zéros à gauche.
// ============================================================================

pub fn to_octet(value: &BigUint, size: FieldSize) -> Result<Octet, CryptoError> {
    if value.bits() > size.bits() {
        return Err(CryptoError::OctetOverflow {
            needed: ((value.bits() + 7) / 8) as usize,
            capacity: size.bytes(),
        });
    }
    let raw = Zeroizing::new(value.to_bytes_be());
    let mut out = Octet::new(size.bytes());
    out.append_bytes(&raw)?;
    out.pad(size.bytes())?;
    Ok(out)
}

/// Lit un Octet d'au plus `size` octets ; plus court, il est lu comme s'il
/// était complété par des zéros à gauche.
pub fn from_octet(oct: &Octet, size: FieldSize) -> Result<BigUint, CryptoError> {
    if oct.len() > size.bytes() {
        return Err(CryptoError::OctetOverflow { needed: oct.len(), capacity: size.bytes() });
    }
    Ok(BigUint::from_bytes_be(oct.as_bytes()))
}

// ---------------------------------------------------------------------------
// Promotion : représentation à `from` → représentation à `to` (to >= from)
// Extension par des zéros de poids fort, la valeur numérique est conservée.
// ---------------------------------------------------------------------------
pub fn promote(oct: &Octet, from: FieldSize, to: FieldSize) -> Result<Octet, CryptoError> {
    if to < from {
        return Err(CryptoError::InvalidInput(format!("promotion de {from} vers {to}")));
    }
    if oct.len() > from.bytes() {
        return Err(CryptoError::OctetOverflow { needed: oct.len(), capacity: from.bytes() });
    }
    let mut out = Octet::new(to.bytes());
    out.append_octet(oct)?;
    out.pad(to.bytes())?;
    Ok(out)
}

// ---------------------------------------------------------------------------
// Troncature : représentation à `from` → représentation à `to` (to <= from)
//
// Les octets de poids faible sont en FIN de tampon : on garde la queue.
// Les octets écartés doivent être nuls, sinon la valeur ne tient pas dans
// `to` et on échoue au lieu de corrompre silencieusement le résultat.
// ---------------------------------------------------------------------------
pub fn truncate(oct: &Octet, from: FieldSize, to: FieldSize) -> Result<Octet, CryptoError> {
    if to > from {
        return Err(CryptoError::InvalidInput(format!("troncature de {from} vers {to}")));
    }
    if oct.len() > from.bytes() {
        return Err(CryptoError::OctetOverflow { needed: oct.len(), capacity: from.bytes() });
    }
    if oct.len() <= to.bytes() {
        return promote(oct, to, to);
    }
    let dropped = oct.len() - to.bytes();
    let high = oct.as_bytes()[..dropped].iter().fold(0u8, |acc, b| acc | b);
    if high != 0 {
        return Err(CryptoError::OctetOverflow { needed: oct.len(), capacity: to.bytes() });
    }
    oct.suffix(to.bytes())
}
