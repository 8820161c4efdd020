use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use zeroize::Zeroizing;
use crate::crypto_error::CryptoError;
use crate::octet::octet::Octet;

// Décodage tolérant : '=' final facultatif, encodage toujours avec '='
const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

// ============================================================================
// Codecs hexadécimal / base64 de Octet
// ============================================================================
impl Octet {
    /// Hex minuscule, deux caractères par octet, sans séparateur
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Décode `s` dans un nouvel Octet de capacité `capacity`.
    /// Accepte majuscules et minuscules.
    pub fn from_hex(capacity: usize, s: &str) -> Result<Octet, CryptoError> {
        let raw = Zeroizing::new(hex::decode(s.trim()).map_err(|_| CryptoError::HexParseError)?);
        Octet::with_capacity_from(capacity, &raw)
    }

    /// Base64 standard (A–Z a–z 0–9 + /), bourrage '=', sans retour à la ligne
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    /// Les blancs sont ignorés ; le décodage s'arrête au bourrage '='
    pub fn from_base64(capacity: usize, s: &str) -> Result<Octet, CryptoError> {
        let compact: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let raw = Zeroizing::new(
            BASE64_LENIENT
                .decode(compact.as_bytes())
                .map_err(|_| CryptoError::Base64ParseError)?,
        );
        Octet::with_capacity_from(capacity, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_lowercase_two_digits() {
        let o = Octet::from_bytes(&[0x00, 0x0a, 0xff, 0x1a]);
        assert_eq!(o.to_hex(), "000aff1a");
        let back = Octet::from_hex(4, "000AFF1a").unwrap();
        assert_eq!(back, o);
    }

    #[test]
    fn test_hex_rejects_garbage_and_overflow() {
        assert_eq!(Octet::from_hex(8, "0g").unwrap_err(), CryptoError::HexParseError);
        assert_eq!(Octet::from_hex(8, "abc").unwrap_err(), CryptoError::HexParseError);
        assert!(matches!(
            Octet::from_hex(1, "abcd").unwrap_err(),
            CryptoError::OctetOverflow { needed: 2, capacity: 1 }
        ));
    }

    #[test]
    fn test_base64_known_values() {
        assert_eq!(Octet::from_bytes(b"f").to_base64(), "Zg==");
        assert_eq!(Octet::from_bytes(b"fo").to_base64(), "Zm8=");
        assert_eq!(Octet::from_bytes(b"foo").to_base64(), "Zm9v");
        assert_eq!(Octet::from_bytes(b"foobar").to_base64(), "Zm9vYmFy");
    }

    #[test]
    fn test_base64_decode_skips_whitespace_and_padding() {
        let o = Octet::from_base64(16, "Zm9v\n YmE=").unwrap();
        assert_eq!(o.as_bytes(), b"fooba");
        let o = Octet::from_base64(16, "Zm9vYmE").unwrap();
        assert_eq!(o.as_bytes(), b"fooba");
        assert_eq!(Octet::from_base64(16, "Zm9v!").unwrap_err(), CryptoError::Base64ParseError);
    }
}
