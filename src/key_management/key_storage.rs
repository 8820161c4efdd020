use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;
use std::io;
use num_bigint::BigUint;
use zeroize::{Zeroize, Zeroizing};
use crate::paillier::p_keygen::{PublicKey, PrivateKey, PlainKey, CrtKey, KeyPair};
use crate::crypto_error::CryptoError;
use crate::field::{from_octet, to_octet, FieldSize};
use crate::octet::Octet;

// ============================================================================
// Protection DoS parsing : limites de taille des entrées
//
// Sans ces limites, un fichier de clés JSON contrôlé par un attaquant peut
// imposer une lecture en mémoire non bornée (fichier de plusieurs Go) ou une
// conversion hex → BigUint coûteuse (champ de plusieurs Mo).
//
// Ces constantes sont vérifiées AVANT toute opération coûteuse.
// Dimensionnées pour des modules jusqu'à 4096 bits :
//   n_squared est au plus 8192 bits = 1024 octets = 2048 caractères hex.
// ============================================================================

/// Taille maximale d'un fichier de clés JSON en octets (32 Ko)
const MAX_KEY_FILE_BYTES: u64 = 32_768;

/// Longueur maximale d'un champ hexadécimal en caractères.
const MAX_HEX_FIELD_LEN: usize = 3_072;

// ============================================================================
// Structures JSON pour la sérialisation des clés
//
// Chaque champ est un hex minuscule à largeur fixe : n à la largeur du
// module, n_squared au double, p et q à la moitié.
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicKeyJson {
    pub bits:      u64,
    pub n:         String,
    pub g:         String,
    pub n_squared: String,
}

/// Clé privée étiquetée par son schéma : `"scheme": "plain" | "crt"`.
/// Les dérivés CRT ne sont pas stockés, ils sont recalculés depuis p et q.
#[derive(Serialize, Deserialize, Clone)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum PrivateKeyJson {
    Plain { bits: u64, n: String, lambda: String, mu: String },
    Crt   { bits: u64, n: String, p: String, q: String },
}

impl Zeroize for PrivateKeyJson {
    fn zeroize(&mut self) {
        match self {
            PrivateKeyJson::Plain { lambda, mu, .. } => {
                lambda.zeroize();
                mu.zeroize();
            }
            PrivateKeyJson::Crt { p, q, .. } => {
                p.zeroize();
                q.zeroize();
            }
        }
    }
}

impl Drop for PrivateKeyJson {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct KeyPairJson {
    pub public_key:  PublicKeyJson,
    pub private_key: PrivateKeyJson,
}

// ============================================================================
// Conversion BigUint ↔ hexadécimal à largeur fixe
// ============================================================================

pub fn biguint_to_hex(value: &BigUint, size: FieldSize) -> Result<String, CryptoError> {
    Ok(to_octet(value, size)?.to_hex())
}

/// Convertit une string hex en BigUint.
///
/// Vérifie la longueur du champ AVANT la conversion.
///
/// Retourne :
///   Err(HexFieldTooLong)  si len > MAX_HEX_FIELD_LEN
///   Err(HexParseError)    si le contenu n'est pas un hex valide
///   Err(OctetOverflow)    si la valeur dépasse la largeur annoncée
pub fn hex_to_biguint(hex_str: &str, size: FieldSize) -> Result<BigUint, CryptoError> {
    if hex_str.len() > MAX_HEX_FIELD_LEN {
        return Err(CryptoError::HexFieldTooLong {
            actual:  hex_str.len(),
            maximum: MAX_HEX_FIELD_LEN,
        });
    }
    let oct = Octet::from_hex(size.bytes(), hex_str)?;
    from_octet(&oct, size)
}

// ============================================================================
// Conversion structures Rust → JSON
// ============================================================================

pub fn public_key_to_json(pk: &PublicKey) -> Result<PublicKeyJson, CryptoError> {
    Ok(PublicKeyJson {
        bits:      pk.size.bits(),
        n:         biguint_to_hex(&pk.n, pk.size)?,
        g:         biguint_to_hex(&pk.g, pk.size.double())?,
        n_squared: biguint_to_hex(&pk.n_squared, pk.size.double())?,
    })
}

pub fn private_key_to_json(sk: &PrivateKey) -> Result<PrivateKeyJson, CryptoError> {
    let size = sk.public_key().size;
    Ok(match sk {
        PrivateKey::Plain(k) => PrivateKeyJson::Plain {
            bits:   size.bits(),
            n:      biguint_to_hex(&k.public.n, size)?,
            lambda: biguint_to_hex(&k.lambda, size)?,
            mu:     biguint_to_hex(&k.mu, size)?,
        },
        PrivateKey::Crt(k) => PrivateKeyJson::Crt {
            bits: size.bits(),
            n:    biguint_to_hex(&k.public.n, size)?,
            p:    biguint_to_hex(&k.p, size.half())?,
            q:    biguint_to_hex(&k.q, size.half())?,
        },
    })
}

pub fn keypair_to_json(kp: &KeyPair) -> Result<KeyPairJson, CryptoError> {
    Ok(KeyPairJson {
        public_key:  public_key_to_json(&kp.public_key)?,
        private_key: private_key_to_json(&kp.private_key)?,
    })
}

// ============================================================================
// Conversion JSON → structures Rust
// Validation de cohérence : g == n+1 et n_squared == n*n vérifiés au
// chargement, λ·μ ≡ 1 (mod n) ou p·q == n pour la clé privée.
// ============================================================================

pub fn json_to_public_key(json: &PublicKeyJson) -> Result<PublicKey, CryptoError> {
    let size      = FieldSize::new(json.bits)?;
    let n         = hex_to_biguint(&json.n, size)?;
    let g         = hex_to_biguint(&json.g, size.double())?;
    let n_squared = hex_to_biguint(&json.n_squared, size.double())?;

    // Cohérence structurelle : protège contre les fichiers JSON corrompus/falsifiés
    let pk = PublicKey::from_modulus(n, size)?;
    if pk.g != g || pk.n_squared != n_squared {
        return Err(CryptoError::KeyCoherenceError);
    }
    Ok(pk)
}

pub fn json_to_private_key(json: &PrivateKeyJson) -> Result<PrivateKey, CryptoError> {
    match json {
        PrivateKeyJson::Plain { bits, n, lambda, mu } => {
            let size   = FieldSize::new(*bits)?;
            let public = PublicKey::from_modulus(hex_to_biguint(n, size)?, size)?;
            let lambda = hex_to_biguint(lambda, size)?;
            let mu     = hex_to_biguint(mu, size)?;
            Ok(PrivateKey::Plain(PlainKey::from_parts(public, lambda, mu)?))
        }
        PrivateKeyJson::Crt { bits, n, p, q } => {
            let size   = FieldSize::new(*bits)?;
            let public = PublicKey::from_modulus(hex_to_biguint(n, size)?, size)?;
            let p      = hex_to_biguint(p, size.half())?;
            let q      = hex_to_biguint(q, size.half())?;
            Ok(PrivateKey::Crt(CrtKey::from_primes(public, p, q)?))
        }
    }
}

pub fn json_to_keypair(json: &KeyPairJson) -> Result<KeyPair, CryptoError> {
    let kp = KeyPair {
        public_key:  json_to_public_key(&json.public_key)?,
        private_key: json_to_private_key(&json.private_key)?,
    };
    kp.validate()?;
    Ok(kp)
}

// ============================================================================
// Vérification de taille de fichier (DoS protection)
//
// Appelée avant fs::read_to_string. La métadonnée est lue sans ouvrir le
// contenu.
// ============================================================================

fn check_file_size(filepath: &str) -> io::Result<()> {
    let meta = fs::metadata(filepath)?;
    if meta.len() > MAX_KEY_FILE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Fichier de clés trop grand : {} octets (maximum autorisé : {} octets). \
                 Possible tentative DoS.",
                meta.len(),
                MAX_KEY_FILE_BYTES
            ),
        ));
    }
    Ok(())
}

fn invalid_data(e: CryptoError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

// ============================================================================
// Sauvegarde JSON sur disque
// Le texte contenant des secrets est effacé après écriture.
// ============================================================================

pub fn save_keypair_json(kp: &KeyPair, filepath: &str) -> io::Result<()> {
    let json = Zeroizing::new(serde_json::to_string_pretty(&keypair_to_json(kp).map_err(invalid_data)?)?);
    fs::write(filepath, json.as_bytes())?;
    Ok(())
}

pub fn save_public_key_json(pk: &PublicKey, filepath: &str) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&public_key_to_json(pk).map_err(invalid_data)?)?;
    fs::write(filepath, json)?;
    Ok(())
}

pub fn save_private_key_json(sk: &PrivateKey, filepath: &str) -> io::Result<()> {
    let json = Zeroizing::new(serde_json::to_string_pretty(&private_key_to_json(sk).map_err(invalid_data)?)?);
    fs::write(filepath, json.as_bytes())?;
    Ok(())
}

// ============================================================================
// Chargement JSON depuis disque
// Vérification de la taille du fichier AVANT la lecture (protection DoS).
// ============================================================================

pub fn load_keypair_json(filepath: &str) -> io::Result<KeyPair> {
    check_file_size(filepath)?;
    let raw  = Zeroizing::new(fs::read_to_string(filepath)?);
    let json: KeyPairJson = serde_json::from_str(&raw)?;
    json_to_keypair(&json).map_err(invalid_data)
}

pub fn load_public_key_json(filepath: &str) -> io::Result<PublicKey> {
    check_file_size(filepath)?;
    let raw  = fs::read_to_string(filepath)?;
    let json: PublicKeyJson = serde_json::from_str(&raw)?;
    json_to_public_key(&json).map_err(invalid_data)
}

pub fn load_private_key_json(filepath: &str) -> io::Result<PrivateKey> {
    check_file_size(filepath)?;
    let raw  = Zeroizing::new(fs::read_to_string(filepath)?);
    let json: PrivateKeyJson = serde_json::from_str(&raw)?;
    json_to_private_key(&json).map_err(invalid_data)
}

// ============================================================================
// Utilitaires
// ============================================================================

pub fn key_file_exists(filepath: &str) -> bool {
    Path::new(filepath).exists()
}

pub fn ensure_keys_directory(dir_path: &str) -> io::Result<()> {
    if !Path::new(dir_path).exists() {
        fs::create_dir_all(dir_path)?;
    }
    Ok(())
}
