use log::trace;
use crate::crypto_error::CryptoError;
use crate::field::to_octet;
use crate::octet::Octet;
use crate::paillier::p_keygen::PublicKey;

// ---------------------------------------------------------------------------
// Addition homomorphe : E(m1) · E(m2) mod n² = E(m1 + m2 mod n)
//
// Les deux chiffrés doivent provenir de la même clé publique : un mélange
// de clés donne un résultat faux sans erreur détectable.
// ---------------------------------------------------------------------------
pub fn p_add(pk: &PublicKey, ct1: &Octet, ct2: &Octet) -> Result<Octet, CryptoError> {
    trace!("addition homomorphe sur {}", pk.size.double());
    let c1 = pk.lift_ciphertext(ct1)?;
    let c2 = pk.lift_ciphertext(ct2)?;
    let c = (&c1 * &c2) % &pk.n_squared;
    to_octet(&c, pk.size.double())
}
