use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use crate::crypto_error::CryptoError;
use crate::field::FieldSize;

/// Module minimal accepté (premiers de 128 bits)
pub const MIN_MODULUS_BITS: u64 = 256;

// Un fichier de configuration ne dépasse jamais quelques centaines d'octets
const MAX_CONFIG_FILE_BYTES: u64 = 4_096;

const MAX_MILLER_RABIN_ROUNDS: u32 = 128;

// ============================================================================
// Schéma de clé privée produit par p_keygen
// ============================================================================
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    /// λ et μ stockés tels quels, une exponentiation modulo n²
    Plain,
    /// Dérivés CRT de p et q, deux exponentiations de demi-taille
    #[default]
    Crt,
}

// ============================================================================
// PaillierConfig : paramètres de génération de clés
//
// Tous les champs ont une valeur par défaut : un JSON partiel, ou vide
// ("{}"), est complété par PaillierConfig::default(). Les clés inconnues
// sont refusées pour ne pas ignorer silencieusement une faute de frappe.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaillierConfig {
    pub modulus_bits:        u64,
    pub scheme:              KeyScheme,
    pub miller_rabin_rounds: u32,
    pub max_prime_search:    u32,
}

impl Default for PaillierConfig {
    fn default() -> Self {
        PaillierConfig {
            modulus_bits:        2048,
            scheme:              KeyScheme::Crt,
            miller_rabin_rounds: 10,
            max_prime_search:    100_000,
        }
    }
}

impl PaillierConfig {
    pub fn validate(&self) -> Result<(), CryptoError> {
        // la moitié doit rester un multiple de 16 bits
        if self.modulus_bits < MIN_MODULUS_BITS || self.modulus_bits % 32 != 0 {
            return Err(CryptoError::KeySizeTooSmall {
                requested: self.modulus_bits,
                minimum:   MIN_MODULUS_BITS,
            });
        }
        if self.miller_rabin_rounds == 0 || self.miller_rabin_rounds > MAX_MILLER_RABIN_ROUNDS {
            return Err(CryptoError::InvalidInput(format!(
                "miller_rabin_rounds = {} hors de [1, {MAX_MILLER_RABIN_ROUNDS}]",
                self.miller_rabin_rounds
            )));
        }
        if self.max_prime_search == 0 {
            return Err(CryptoError::InvalidInput("max_prime_search doit être > 0".into()));
        }
        Ok(())
    }

    /// Largeur du module n, après validation
    pub fn field_size(&self) -> Result<FieldSize, CryptoError> {
        self.validate()?;
        FieldSize::new(self.modulus_bits)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CryptoError> {
        let config: PaillierConfig = serde_json::from_str(raw)
            .map_err(|e| CryptoError::InvalidInput(format!("configuration JSON : {e}")))?;
        config.validate()?;
        Ok(config)
    }

    // -----------------------------------------------------------------------
    // Chargement depuis un fichier, taille vérifiée avant lecture
    // -----------------------------------------------------------------------
    pub fn from_json_file(filepath: &str) -> io::Result<Self> {
        let meta = fs::metadata(filepath)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Fichier de configuration trop grand : {} octets (maximum : {} octets)",
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            ));
        }
        let raw = fs::read_to_string(filepath)?;
        PaillierConfig::from_json_str(&raw)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = PaillierConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.field_size().unwrap(), FieldSize::FF_2048);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = PaillierConfig::from_json_str(r#"{ "modulus_bits": 512, "scheme": "plain" }"#).unwrap();
        assert_eq!(c.modulus_bits, 512);
        assert_eq!(c.scheme, KeyScheme::Plain);
        assert_eq!(c.miller_rabin_rounds, 10);
        assert_eq!(PaillierConfig::from_json_str("{}").unwrap(), PaillierConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PaillierConfig::from_json_str(r#"{ "modulus_bits": 128 }"#).is_err());
        assert!(PaillierConfig::from_json_str(r#"{ "modulus_bits": 1040 }"#).is_err());
        assert!(PaillierConfig::from_json_str(r#"{ "miller_rabin_rounds": 0 }"#).is_err());
        assert!(PaillierConfig::from_json_str(r#"{ "scheme": "rsa" }"#).is_err());
        assert!(PaillierConfig::from_json_str(r#"{ "modulus_bit": 2048 }"#).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!("paillier_config_{}.json", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        fs::write(&path, r#"{ "modulus_bits": 1024, "max_prime_search": 500 }"#).unwrap();
        let c = PaillierConfig::from_json_file(&path_str).unwrap();
        assert_eq!(c.modulus_bits, 1024);
        assert_eq!(c.max_prime_search, 500);
        assert_eq!(c.scheme, KeyScheme::Crt);
        fs::remove_file(&path).unwrap();
        assert!(PaillierConfig::from_json_file(&path_str).is_err());
    }
}
