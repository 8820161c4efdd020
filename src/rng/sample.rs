use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::RngCore;
use zeroize::Zeroizing;
use crate::crypto_error::CryptoError;

// Nombre maximal de rejets avant de considérer le générateur comme défaillant.
// Chaque tirage est accepté avec une probabilité >= 1/2.
const MAX_REJECTIONS: u32 = 128;

// ---------------------------------------------------------------------------
// Entier uniforme de `nbits` bits au plus (bit de poids fort non forcé).
// Passe par try_fill_bytes : une panne d'entropie remonte en Err.
// ---------------------------------------------------------------------------
pub fn random_bits<R: RngCore + ?Sized>(nbits: u64, rng: &mut R) -> Result<BigUint, CryptoError> {
    if nbits == 0 {
        return Ok(BigUint::zero());
    }
    let nbytes = ((nbits + 7) / 8) as usize;
    let mut buf = Zeroizing::new(vec![0u8; nbytes]);
    rng.try_fill_bytes(&mut buf)?;
    let excess = (nbytes as u64) * 8 - nbits;
    buf[0] &= 0xffu8 >> excess;
    Ok(BigUint::from_bytes_be(&buf))
}

/// Entier uniforme dans [0, bound), par rejet
pub fn random_below<R: RngCore + ?Sized>(bound: &BigUint, rng: &mut R) -> Result<BigUint, CryptoError> {
    if bound.is_zero() {
        return Err(CryptoError::InvalidInput("borne de tirage nulle".into()));
    }
    let bits = bound.bits();
    for _ in 0..MAX_REJECTIONS {
        let candidate = random_bits(bits, rng)?;
        if &candidate < bound {
            return Ok(candidate);
        }
    }
    Err(CryptoError::RngFailure(format!("{MAX_REJECTIONS} rejets consécutifs")))
}

/// Entier uniforme dans [low, high)
pub fn random_range<R: RngCore + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    if high <= low {
        return Err(CryptoError::InvalidInput("intervalle de tirage vide".into()));
    }
    Ok(low + random_below(&(high - low), rng)?)
}
