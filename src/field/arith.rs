use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Inverse de `a` (impair) modulo 2^m, par itération de Newton :
//   si a·x ≡ 1 (mod 2^k) alors a·x(2 − a·x) ≡ 1 (mod 2^2k)
// Le point de départ x = 1 est exact modulo 2 pour tout a impair.
// ---------------------------------------------------------------------------
pub fn inv_mod_pow2(a: &BigUint, m: u64) -> Result<BigUint, CryptoError> {
    if a.is_even() {
        return Err(CryptoError::NoModularInverse);
    }
    if m == 0 {
        return Ok(BigUint::zero());
    }

    let mut x = BigUint::one();
    let mut k = 1u64;
    while k < m {
        k = (2 * k).min(m);
        let modulus = BigUint::one() << k;
        let mask = &modulus - 1u32;
        let ax = (a * &x) & &mask;
        let correction = (&modulus + 2u32 - ax) & &mask;
        x = (x * correction) & &mask;
    }
    Ok(x & ((BigUint::one() << m) - 1u32))
}

// ============================================================================
// ct_pow : exponentiation par échelle de Montgomery
//
// La boucle parcourt exactement `exp_bits` bits de l'exposant, quel que soit
// son nombre de bits significatifs, et chaque tour fait une multiplication
// et un carré. Réservé aux exposants secrets (λ, λp, λq) ou fournis par
// l'appelant (scalaire de p_mult) ; les exposants publics passent par modpow.
//
// Limite : les opérations de BigUint sur les limbs restent à temps variable.
// ============================================================================
pub fn ct_pow(
    base: &BigUint,
    exponent: &BigUint,
    modulus: &BigUint,
    exp_bits: u64,
) -> Result<BigUint, CryptoError> {
    if modulus.is_zero() {
        return Err(CryptoError::DivisionByZero);
    }
    if exponent.bits() > exp_bits {
        return Err(CryptoError::InvalidInput(format!(
            "exposant de {} bits pour une échelle de {exp_bits} bits",
            exponent.bits()
        )));
    }

    let mut r0 = BigUint::one() % modulus;
    let mut r1 = base % modulus;
    for i in (0..exp_bits).rev() {
        if exponent.bit(i) {
            r0 = (&r0 * &r1) % modulus;
            r1 = (&r1 * &r1) % modulus;
        } else {
            r1 = (&r0 * &r1) % modulus;
            r0 = (&r0 * &r0) % modulus;
        }
    }
    Ok(r0)
}
