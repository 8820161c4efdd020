use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use log::{trace, warn};
use crate::crypto_error::CryptoError;
use crate::field::{from_octet, to_octet};
use crate::octet::Octet;
use crate::paillier::math::{gcd, wipe_biguint};
use crate::paillier::p_keygen::PublicKey;
use crate::rng::random_range;

// Tirages de r consécutifs non premiers avec n avant d'abandonner
const MAX_R_ATTEMPTS: u32 = 64;

// ---------------------------------------------------------------------------
// Chiffrement Paillier : c = g^m · r^n  mod n²
//
// Avec g = n+1 : g^m ≡ 1 + m·n (mod n²), le terme g^m coûte une
// multiplication au lieu d'une exponentiation.
// ---------------------------------------------------------------------------
fn encrypt_with(pk: &PublicKey, m: &BigUint, r: &BigUint) -> Result<Octet, CryptoError> {
    let mut g_m = (BigUint::one() + m * &pk.n) % &pk.n_squared;
    let mut r_n = r.modpow(&pk.n, &pk.n_squared);
    let c = (&g_m * &r_n) % &pk.n_squared;
    wipe_biguint(&mut g_m);
    wipe_biguint(&mut r_n);
    to_octet(&c, pk.size.double())
}

// Choisit r dans Z*_n : gcd(r, n) = 1
fn sample_r<R: RngCore + CryptoRng + ?Sized>(pk: &PublicKey, rng: &mut R) -> Result<BigUint, CryptoError> {
    for _ in 0..MAX_R_ATTEMPTS {
        let mut candidate = random_range(&BigUint::one(), &pk.n, rng)?;
        if gcd(&candidate, &pk.n).is_one() {
            return Ok(candidate);
        }
        wipe_biguint(&mut candidate);
    }
    Err(CryptoError::RngFailure(format!("{MAX_R_ATTEMPTS} tirages de r non inversibles")))
}

/// Chiffre `pt` (largeur du module) ; le chiffré est à la largeur de n².
/// Retourne Err(MessageOutOfRange) si m >= n.
pub fn p_encrypt<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    pk: &PublicKey,
    pt: &Octet,
) -> Result<Octet, CryptoError> {
    trace!("chiffrement Paillier, clair {} octets", pt.len());
    let mut m = pk.lift_plaintext(pt)?;
    let mut r = sample_r(pk, rng)?;
    let ct = encrypt_with(pk, &m, &r);
    wipe_biguint(&mut r);
    wipe_biguint(&mut m);
    ct
}

// ---------------------------------------------------------------------------
// Chemin déterministe : r fourni par l'appelant, dans [1, n).
// Réservé à la reproduction de vecteurs de test.
// ---------------------------------------------------------------------------
pub fn p_encrypt_with_r(pk: &PublicKey, pt: &Octet, r: &Octet) -> Result<Octet, CryptoError> {
    let mut m = pk.lift_plaintext(pt)?;
    let mut r = match from_octet(r, pk.size) {
        Ok(r) if !r.is_zero() && r < pk.n => r,
        Ok(mut r) => {
            wipe_biguint(&mut r);
            wipe_biguint(&mut m);
            return Err(CryptoError::RandomnessOutOfRange);
        }
        Err(_) => {
            wipe_biguint(&mut m);
            return Err(CryptoError::RandomnessOutOfRange);
        }
    };
    let ct = encrypt_with(pk, &m, &r);
    wipe_biguint(&mut r);
    wipe_biguint(&mut m);
    ct
}

// ---------------------------------------------------------------------------
// Comme p_encrypt, mais renvoie aussi r (largeur du module).
// r permet de rouvrir le chiffré : jamais en production.
// ---------------------------------------------------------------------------
pub fn p_encrypt_expose_r<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    pk: &PublicKey,
    pt: &Octet,
) -> Result<(Octet, Octet), CryptoError> {
    warn!("p_encrypt_expose_r : l'aléa de chiffrement est exporté (usage test uniquement)");
    let mut m = pk.lift_plaintext(pt)?;
    let mut r = sample_r(pk, rng)?;
    let result = encrypt_with(pk, &m, &r)
        .and_then(|ct| to_octet(&r, pk.size).map(|r_oct| (ct, r_oct)));
    wipe_biguint(&mut r);
    wipe_biguint(&mut m);
    result
}
