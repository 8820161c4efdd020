use num_bigint::BigUint;
use num_traits::Zero;
use crate::crypto_error::CryptoError;

// ============================================================================
// Division longue par décalage-soustraction
//
// dividend = quotient·divisor + remainder,  0 <= remainder < divisor
//
// À chaque tour le diviseur est aligné sur le bit de poids fort du reste
// (recul d'un cran si l'alignement dépasse), puis soustrait ; le bit
// correspondant du quotient est levé. Les décalages sont strictement
// décroissants, chaque bit du quotient n'est donc levé qu'une fois.
// ============================================================================
pub fn long_div(dividend: &BigUint, divisor: &BigUint) -> Result<(BigUint, BigUint), CryptoError> {
    if divisor.is_zero() {
        return Err(CryptoError::DivisionByZero);
    }

    let mut quotient = BigUint::zero();
    let mut remainder = dividend.clone();

    while &remainder >= divisor {
        let mut shift = remainder.bits() - divisor.bits();
        let mut aligned = divisor << shift;
        if aligned > remainder {
            shift -= 1;
            aligned >>= 1u32;
        }
        remainder -= &aligned;
        quotient.set_bit(shift, true);
    }

    Ok((quotient, remainder))
}
