// ============================================================================
// Cohérence Octet : construction, codecs, politique de dépassement et
// passage entre largeurs de travail
// ============================================================================

use num_bigint::BigUint;
use paillier_octet::field::{from_octet, promote, to_octet, truncate, FieldSize};
use paillier_octet::{Csprng, CryptoError, Octet};

#[test]
fn test_build_and_encode() {
    let mut o = Octet::new(32);
    o.append_str("foo").unwrap();
    o.append_bytes(b"bar").unwrap();
    assert_eq!(o.to_base64(), "Zm9vYmFy");
    assert_eq!(o.to_hex(), "666f6f626172");

    o.append_int(0x0102, 4).unwrap();
    o.append_byte(0xff, 2).unwrap();
    assert_eq!(o.to_hex(), "666f6f62617200000102ffff");
    assert_eq!(o.len(), 12);
    assert_eq!(o.capacity(), 32);
}

#[test]
fn test_codecs_accept_their_own_output() {
    let mut rng = Csprng::seed(&Octet::from_bytes(b"octets")).unwrap();
    let mut o = Octet::new(64);
    o.random(&mut rng, 61).unwrap();

    let from_hex = Octet::from_hex(64, &o.to_hex()).unwrap();
    let from_b64 = Octet::from_base64(64, &o.to_base64()).unwrap();
    assert_eq!(from_hex, o);
    assert_eq!(from_b64, o);
}

#[test]
fn test_base64_lenient_decode() {
    let a = Octet::from_base64(8, "Zm9vYg==").unwrap();
    let b = Octet::from_base64(8, "Zm9v\nYg").unwrap();
    assert_eq!(a.as_bytes(), b"foob");
    assert_eq!(a, b);
    assert_eq!(Octet::from_base64(8, "Zm9v*g=="), Err(CryptoError::Base64ParseError));
}

#[test]
fn test_overflow_leaves_buffer_unchanged() {
    let mut o = Octet::with_capacity_from(4, b"abc").unwrap();
    assert_eq!(
        o.append_bytes(b"de"),
        Err(CryptoError::OctetOverflow { needed: 5, capacity: 4 })
    );
    assert_eq!(o.as_bytes(), b"abc");
    assert!(Octet::from_hex(2, "010203").is_err());
    assert!(o.pad(5).is_err());
    assert!(o.pad(2).is_err());
    o.pad(4).unwrap();
    assert_eq!(o.as_bytes(), b"\0abc");
}

#[test]
fn test_chop_suffix_shift() {
    let mut o = Octet::from_bytes(&[1, 2, 3, 4, 5, 6]);
    let tail = o.chop(4);
    assert_eq!(tail.as_bytes(), &[5, 6]);
    assert_eq!(o.as_bytes(), &[1, 2, 3, 4]);
    assert_eq!(o.suffix(2).unwrap().as_bytes(), &[3, 4]);
    o.shift_left(1);
    assert_eq!(o.as_bytes(), &[2, 3, 4]);
}

#[test]
fn test_constant_time_comparisons() {
    let a = Octet::from_bytes(b"secret-1");
    let b = Octet::from_bytes(b"secret-2");
    assert!(!a.ct_eq(&b));
    assert!(a.ct_eq_prefix(&b, 7));
    assert!(!a.ct_eq_prefix(&b, 8));
    assert!(!a.ct_eq(&Octet::from_bytes(b"secret-")));
}

#[test]
fn test_width_promotion_preserves_value() {
    let v = BigUint::parse_bytes(b"c0ffee0123456789", 16).unwrap();
    let narrow = to_octet(&v, FieldSize::FF_2048).unwrap();
    let wide = promote(&narrow, FieldSize::FF_2048, FieldSize::FF_4096).unwrap();
    assert_eq!(wide.len(), 512);
    assert_eq!(from_octet(&wide, FieldSize::FF_4096).unwrap(), v);

    let back = truncate(&wide, FieldSize::FF_4096, FieldSize::FF_2048).unwrap();
    assert_eq!(back, narrow);

    // Une valeur qui occupe la moitié haute ne peut pas être tronquée
    let big = BigUint::from(1u32) << 3000u32;
    let big_oct = to_octet(&big, FieldSize::FF_4096).unwrap();
    assert!(truncate(&big_oct, FieldSize::FF_4096, FieldSize::FF_2048).is_err());
}

#[test]
fn test_clear_wipes_content() {
    let mut o = Octet::from_bytes(&[0xaa; 16]);
    o.clear();
    assert!(o.is_empty());
    assert_eq!(o.capacity(), 16);
    o.append_byte(0, 0).unwrap();
    assert_eq!(o.len(), 0);
}
