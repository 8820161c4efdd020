use num_bigint::BigUint;
use num_traits::{One, Zero};
use log::trace;
use crate::crypto_error::CryptoError;
use crate::field::{ct_pow, to_octet, truncate};
use crate::octet::Octet;
use crate::paillier::math::{gcd, l_function, wipe_biguint};
use crate::paillier::p_keygen::{CrtKey, PlainKey, PrivateKey, PublicKey};

/// Déchiffre `ct` (largeur de n²) ; le clair est rendu à la largeur du module.
pub fn p_decrypt(sk: &PrivateKey, ct: &Octet) -> Result<Octet, CryptoError> {
    if sk.is_destroyed() {
        return Err(CryptoError::InvalidInput("clé privée détruite".into()));
    }
    trace!("déchiffrement Paillier, schéma {:?}", sk.scheme());
    match sk {
        PrivateKey::Plain(key) => decrypt_plain(key, ct),
        PrivateKey::Crt(key) => decrypt_crt(key, ct),
    }
}

// ---------------------------------------------------------------------------
// Un chiffré valide est inversible modulo n². Un multiple de p ou de q
// donnerait un clair arbitraire en schéma simple et une erreur en CRT :
// les deux schémas le refusent ici, avant toute exponentiation secrète.
// ---------------------------------------------------------------------------
fn lift_invertible(pk: &PublicKey, ct: &Octet) -> Result<BigUint, CryptoError> {
    let c = pk.lift_ciphertext(ct)?;
    if !gcd(&c, &pk.n).is_one() {
        return Err(CryptoError::CiphertextNotInvertible);
    }
    Ok(c)
}

// ---------------------------------------------------------------------------
// Schéma simple : m = L(c^λ mod n²) · μ  mod n
//
// Le calcul se fait dans l'espace n² ; le résultat est sérialisé à cette
// largeur puis tronqué à celle du module.
// ---------------------------------------------------------------------------
fn decrypt_plain(key: &PlainKey, ct: &Octet) -> Result<Octet, CryptoError> {
    let pk = &key.public;
    let c = lift_invertible(pk, ct)?;

    let mut c_lambda = ct_pow(&c, &key.lambda, &pk.n_squared, pk.size.bits())?;
    let l = l_function(&c_lambda, &pk.n);
    wipe_biguint(&mut c_lambda);
    let mut l = l?;

    let mut m = (&l * &key.mu) % &pk.n;
    wipe_biguint(&mut l);

    let wide = to_octet(&m, pk.size.double());
    wipe_biguint(&mut m);
    truncate(&wide?, pk.size.double(), pk.size)
}

// ---------------------------------------------------------------------------
// Une moitié CRT : mp · ((c^lp mod p² − 1) / p)  mod p
//
// ws = c^lp mod p² − 1 est un multiple exact de p et ws/p < p < 2^m :
// la division est une multiplication par p⁻¹ mod 2^m.
// ---------------------------------------------------------------------------
#[allow(clippy::too_many_arguments)]
fn crt_half(
    c: &BigUint,
    prime: &BigUint,
    prime_sq: &BigUint,
    l: &BigUint,
    m_inv: &BigUint,
    inv_2m: &BigUint,
    width: u64,
    exp_bits: u64,
) -> Result<BigUint, CryptoError> {
    let mut reduced = c % prime_sq;
    let ws = ct_pow(&reduced, l, prime_sq, exp_bits);
    wipe_biguint(&mut reduced);
    let mut ws = ws?;
    if ws.is_zero() {
        return Err(CryptoError::CiphertextNotInvertible);
    }
    ws -= BigUint::one();

    let mask = (BigUint::one() << width) - 1u32;
    let mut quotient = (&ws * inv_2m) & &mask;
    wipe_biguint(&mut ws);

    let half = (&quotient * m_inv) % prime;
    wipe_biguint(&mut quotient);
    Ok(half)
}

// ---------------------------------------------------------------------------
// Schéma CRT : deux exponentiations de demi-taille, recombinées par
//   m = mp_part + p · ((mq_part − mp_part) · p⁻¹ mod q)
// ---------------------------------------------------------------------------
fn decrypt_crt(key: &CrtKey, ct: &Octet) -> Result<Octet, CryptoError> {
    let pk = &key.public;
    let c = lift_invertible(pk, ct)?;
    let width = pk.size.bits();
    let half_bits = pk.size.half().bits();

    let mut ptp = crt_half(&c, &key.p, &key.p2, &key.lp, &key.mp, &key.invp, width, half_bits)?;
    let mut ptq = match crt_half(&c, &key.q, &key.q2, &key.lq, &key.mq, &key.invq, width, half_bits) {
        Ok(v) => v,
        Err(e) => {
            wipe_biguint(&mut ptp);
            return Err(e);
        }
    };

    let mut diff = (&ptq + &key.q - (&ptp % &key.q)) % &key.q;
    let mut h = (&diff * &key.invpq) % &key.q;
    let mut m = &ptp + &key.p * &h;

    for tmp in [&mut ptp, &mut ptq, &mut diff, &mut h] {
        wipe_biguint(tmp);
    }
    let out = to_octet(&m, pk.size);
    wipe_biguint(&mut m);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;
    use crate::config::{KeyScheme, PaillierConfig};
    use crate::field::from_octet;
    use crate::paillier::p_encrypt::{p_encrypt, p_encrypt_with_r};
    use crate::paillier::p_keygen::p_keygen;
    use crate::paillier::test_keypair;

    #[test]
    fn test_round_trip_both_schemes() {
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);
        for scheme in [KeyScheme::Plain, KeyScheme::Crt] {
            let kp = test_keypair(scheme);
            let pk = &kp.public_key;
            let n_minus_1 = &pk.n - 1u32;
            for v in [BigUint::zero(), BigUint::one(), BigUint::from(0xdead_beefu32), n_minus_1] {
                let pt = to_octet(&v, pk.size).unwrap();
                let ct = p_encrypt(&mut rng, pk, &pt).unwrap();
                let back = p_decrypt(&kp.private_key, &ct).unwrap();
                assert_eq!(back.len(), pk.size.bytes());
                assert_eq!(back, pt);
            }
        }
    }

    #[test]
    fn test_crt_and_plain_agree() {
        let plain = test_keypair(KeyScheme::Plain);
        let crt = test_keypair(KeyScheme::Crt);
        assert_eq!(plain.public_key, crt.public_key);
        let pk = &crt.public_key;
        let mut rng = ChaCha20Rng::from_seed([32u8; 32]);
        for v in [3u64, 1 << 40, 987_654_321] {
            let pt = to_octet(&BigUint::from(v), pk.size).unwrap();
            let ct = p_encrypt(&mut rng, pk, &pt).unwrap();
            assert_eq!(
                p_decrypt(&plain.private_key, &ct).unwrap(),
                p_decrypt(&crt.private_key, &ct).unwrap()
            );
        }
    }

    #[test]
    fn test_round_trip_512_bit_generated_key() {
        let mut rng = ChaCha20Rng::from_seed([33u8; 32]);
        let config = PaillierConfig { modulus_bits: 512, ..PaillierConfig::default() };
        let kp = p_keygen(&mut rng, &config).unwrap();
        let pk = &kp.public_key;
        let pt = to_octet(&(&pk.n >> 3u32), pk.size).unwrap();
        let r = to_octet(&(&pk.n - 2u32), pk.size).unwrap();
        let ct = p_encrypt_with_r(pk, &pt, &r).unwrap();
        assert_eq!(p_decrypt(&kp.private_key, &ct).unwrap(), pt);
    }

    #[test]
    fn test_rejects_bad_ciphertexts() {
        for scheme in [KeyScheme::Plain, KeyScheme::Crt] {
            let kp = test_keypair(scheme);
            let pk = &kp.public_key;
            let n2 = to_octet(&pk.n_squared, pk.size.double()).unwrap();
            assert_eq!(p_decrypt(&kp.private_key, &n2), Err(CryptoError::CiphertextOutOfRange));
            let zero = to_octet(&BigUint::zero(), pk.size.double()).unwrap();
            assert_eq!(p_decrypt(&kp.private_key, &zero), Err(CryptoError::CiphertextNotInvertible));
        }
    }

    #[test]
    fn test_multiples_of_a_prime_rejected_by_both_schemes() {
        let p = (BigUint::one() << 127u32) - 1u32;
        let q = (BigUint::one() << 89u32) - 1u32;
        for scheme in [KeyScheme::Plain, KeyScheme::Crt] {
            let kp = test_keypair(scheme);
            let pk = &kp.public_key;
            for c in [p.clone(), &q * 12345u32, &p * &q, &pk.n_squared - &p] {
                assert!(c < pk.n_squared);
                let ct = to_octet(&c, pk.size.double()).unwrap();
                assert_eq!(
                    p_decrypt(&kp.private_key, &ct),
                    Err(CryptoError::CiphertextNotInvertible),
                    "schéma {scheme:?}"
                );
            }
        }
    }

    #[test]
    fn test_killed_key_refuses_to_decrypt() {
        let mut kp = test_keypair(KeyScheme::Crt);
        let pk = kp.public_key.clone();
        let pt = to_octet(&BigUint::from(9u32), pk.size).unwrap();
        let r = to_octet(&BigUint::from(2u32), pk.size).unwrap();
        let ct = p_encrypt_with_r(&pk, &pt, &r).unwrap();
        let back = p_decrypt(&kp.private_key, &ct).unwrap();
        assert_eq!(from_octet(&back, pk.size).unwrap(), BigUint::from(9u32));
        kp.private_key.kill();
        assert!(p_decrypt(&kp.private_key, &ct).is_err());
    }
}
