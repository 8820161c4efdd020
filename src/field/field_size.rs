use crate::crypto_error::CryptoError;

// Plus petite largeur acceptée : premiers de 128 bits (module de 256 bits)
pub const MIN_FIELD_BITS: u64 = 128;

// ============================================================================
// FieldSize : largeur de travail en bits
//
// Famille de production : 2048 (module n), 4096 (n², ou module de 4096),
// 8192 (n² pour un module de 4096). Toute largeur multiple de 16 et
// >= MIN_FIELD_BITS est acceptée, la moitié tombe donc toujours sur un octet.
// ============================================================================
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldSize {
    bits: u64,
}

impl FieldSize {
    pub const FF_2048: FieldSize = FieldSize { bits: 2048 };
    pub const FF_4096: FieldSize = FieldSize { bits: 4096 };
    pub const FF_8192: FieldSize = FieldSize { bits: 8192 };

    pub fn new(bits: u64) -> Result<Self, CryptoError> {
        if bits < MIN_FIELD_BITS || bits % 16 != 0 {
            return Err(CryptoError::KeySizeTooSmall {
                requested: bits,
                minimum: MIN_FIELD_BITS,
            });
        }
        Ok(FieldSize { bits })
    }

    #[inline]
    pub fn bits(self) -> u64 {
        self.bits
    }

    /// Longueur canonique en octets
    #[inline]
    pub fn bytes(self) -> usize {
        (self.bits / 8) as usize
    }

    /// Largeur des facteurs premiers
    #[inline]
    pub fn half(self) -> FieldSize {
        FieldSize { bits: self.bits / 2 }
    }

    /// Largeur de l'espace des chiffrés
    #[inline]
    pub fn double(self) -> FieldSize {
        FieldSize { bits: self.bits * 2 }
    }
}

impl std::fmt::Display for FieldSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FF_{}", self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_relations() {
        assert_eq!(FieldSize::FF_2048.double(), FieldSize::FF_4096);
        assert_eq!(FieldSize::FF_4096.double(), FieldSize::FF_8192);
        assert_eq!(FieldSize::FF_4096.half(), FieldSize::FF_2048);
        assert_eq!(FieldSize::FF_2048.bytes(), 256);
        assert_eq!(FieldSize::FF_4096.bytes(), 512);
    }

    #[test]
    fn test_new_rejects_bad_widths() {
        assert!(FieldSize::new(512).is_ok());
        assert!(FieldSize::new(520).is_err());
        assert!(FieldSize::new(64).is_err());
        assert_eq!(FieldSize::new(2048).unwrap(), FieldSize::FF_2048);
    }
}
