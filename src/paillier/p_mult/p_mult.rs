use log::trace;
use crate::crypto_error::CryptoError;
use crate::field::{ct_pow, to_octet};
use crate::octet::Octet;
use crate::paillier::math::wipe_biguint;
use crate::paillier::p_keygen::PublicKey;

// ---------------------------------------------------------------------------
// Multiplication par un scalaire clair : E(m)^k mod n² = E(k·m mod n)
//
// k est fourni par l'appelant et peut être sensible : exponentiation par
// échelle, sur toute la largeur du module.
// ---------------------------------------------------------------------------
pub fn p_mult(pk: &PublicKey, ct: &Octet, pt: &Octet) -> Result<Octet, CryptoError> {
    trace!("multiplication homomorphe sur {}", pk.size.double());
    let c = pk.lift_ciphertext(ct)?;
    let mut k = pk.lift_plaintext(pt)?;
    let product = ct_pow(&c, &k, &pk.n_squared, pk.size.bits());
    wipe_biguint(&mut k);
    to_octet(&product?, pk.size.double())
}
