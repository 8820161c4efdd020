// ============================================================================
// Cohérence Paillier de bout en bout
//
// Vecteur du dépôt : graine 78d0fb6705ce77dee47d03eb5b9c5d30, module de
// 2048 bits, E(2)·3 ⊕ E(4)·5 doit se déchiffrer en 0x1a.
// ============================================================================

use num_bigint::BigUint;
use paillier_octet::config::{KeyScheme, PaillierConfig};
use paillier_octet::field::{from_octet, to_octet, FieldSize};
use paillier_octet::key_management::{private_key_to_json, PrivateKeyJson};
use paillier_octet::{
    p_add, p_decrypt, p_encrypt, p_keygen, p_keygen_from_primes, p_mult, Csprng, CryptoError,
    KeyPair, Octet,
};

const SEED_HEX: &str = "78d0fb6705ce77dee47d03eb5b9c5d30";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn seeded_rng() -> Csprng {
    let seed = Octet::from_hex(16, SEED_HEX).unwrap();
    Csprng::seed(&seed).unwrap()
}

fn small(v: u32, size: FieldSize) -> Octet {
    to_octet(&BigUint::from(v), size).unwrap()
}

// Reconstruit la même paire avec l'autre schéma à partir de p et q
fn with_plain_scheme(kp: &KeyPair, config: &PaillierConfig) -> KeyPair {
    let json = private_key_to_json(&kp.private_key).unwrap();
    let half = kp.public_key.size.half();
    let (p, q) = match &json {
        PrivateKeyJson::Crt { p, q, .. } => (
            Octet::from_hex(half.bytes(), p).unwrap(),
            Octet::from_hex(half.bytes(), q).unwrap(),
        ),
        PrivateKeyJson::Plain { .. } => panic!("clé CRT attendue"),
    };
    let plain_config = PaillierConfig { scheme: KeyScheme::Plain, ..config.clone() };
    p_keygen_from_primes(&p, &q, &plain_config).unwrap()
}

#[test]
fn test_repository_vector_2048() {
    init_logger();
    let mut rng = seeded_rng();
    let config = PaillierConfig::default();
    assert_eq!(config.modulus_bits, 2048);
    assert_eq!(config.scheme, KeyScheme::Crt);

    let kp = p_keygen(&mut rng, &config).unwrap();
    kp.validate().unwrap();
    let pk = &kp.public_key;
    assert_eq!(pk.size, FieldSize::FF_2048);
    assert_eq!(pk.n.bits(), 2048);

    let ct1 = p_encrypt(&mut rng, pk, &small(2, pk.size)).unwrap();
    let ct2 = p_encrypt(&mut rng, pk, &small(4, pk.size)).unwrap();
    assert_eq!(ct1.len(), 512);

    let ct3 = p_mult(pk, &ct1, &small(3, pk.size)).unwrap();
    let ct4 = p_mult(pk, &ct2, &small(5, pk.size)).unwrap();
    let ct5 = p_add(pk, &ct3, &ct4).unwrap();

    let pt = p_decrypt(&kp.private_key, &ct5).unwrap();
    assert_eq!(pt.len(), 256);
    let mut expected = "00".repeat(255);
    expected.push_str("1a");
    assert_eq!(pt.to_hex(), expected);

    // Même résultat par le schéma simple
    let plain = with_plain_scheme(&kp, &config);
    plain.validate().unwrap();
    assert_eq!(plain.public_key, kp.public_key);
    assert_eq!(p_decrypt(&plain.private_key, &ct5).unwrap(), pt);
}

#[test]
fn test_seeded_keygen_is_reproducible() {
    init_logger();
    let config = PaillierConfig { modulus_bits: 512, ..PaillierConfig::default() };
    let a = p_keygen(&mut seeded_rng(), &config).unwrap();
    let b = p_keygen(&mut seeded_rng(), &config).unwrap();
    assert_eq!(a.public_key, b.public_key);
}

#[test]
fn test_homomorphic_sum_of_many() {
    init_logger();
    let mut rng = seeded_rng();
    let config = PaillierConfig { modulus_bits: 512, ..PaillierConfig::default() };
    let kp = p_keygen(&mut rng, &config).unwrap();
    let pk = &kp.public_key;

    let mut acc = p_encrypt(&mut rng, pk, &small(0, pk.size)).unwrap();
    let mut expected = 0u32;
    for v in 1..=20u32 {
        let ct = p_encrypt(&mut rng, pk, &small(v, pk.size)).unwrap();
        acc = p_add(pk, &acc, &ct).unwrap();
        expected += v;
    }
    let pt = p_decrypt(&kp.private_key, &acc).unwrap();
    assert_eq!(from_octet(&pt, pk.size).unwrap(), BigUint::from(expected));
}

#[test]
fn test_destroyed_key_fails() {
    init_logger();
    let mut rng = seeded_rng();
    let config = PaillierConfig { modulus_bits: 512, ..PaillierConfig::default() };
    let mut kp = p_keygen(&mut rng, &config).unwrap();
    let ct = p_encrypt(&mut rng, &kp.public_key, &small(7, kp.public_key.size)).unwrap();

    kp.private_key.kill();
    assert!(kp.private_key.is_destroyed());
    assert!(matches!(p_decrypt(&kp.private_key, &ct), Err(CryptoError::InvalidInput(_))));
    assert!(kp.validate().is_err());
}
