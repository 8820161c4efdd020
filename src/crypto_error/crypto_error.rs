// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// L'appelant reçoit une Err(...) typée et décide quoi en faire ; aucune
// opération ne produit silencieusement un résultat faux.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Le message m est >= n (hors domaine plaintext Paillier)
    MessageOutOfRange,
    /// Le chiffré c est >= n² (hors domaine ciphertext Paillier)
    CiphertextOutOfRange,
    /// L'aléa r fourni n'est pas dans [1, n)
    RandomnessOutOfRange,
    /// Le chiffré n'est pas inversible modulo p² ou q² (ou vaut 0)
    CiphertextNotInvertible,
    /// La taille de clé demandée est trop petite ou mal alignée
    KeySizeTooSmall { requested: u64, minimum: u64 },
    /// Premiers p, q fournis par l'appelant incohérents
    InvalidPrimes(String),

    // --- Erreurs mathématiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1)
    NoModularInverse,
    /// Division par zéro dans la division longue
    DivisionByZero,
    /// Recherche de premier abandonnée après `iterations` incréments
    PrimeSearchExhausted { iterations: u32 },
    /// Le générateur aléatoire a échoué (entropie indisponible)
    RngFailure(String),

    // --- Erreurs d'octets ---
    /// L'écriture dépasse la capacité du tampon
    OctetOverflow { needed: usize, capacity: usize },
    /// Parsing hexadécimal invalide
    HexParseError,
    /// Parsing base64 invalide
    Base64ParseError,
    /// Champ hex trop long : vecteur DoS potentiel (conversion BigUint coûteuse)
    HexFieldTooLong { actual: usize, maximum: usize },

    // --- Erreurs de stockage / parsing des clés ---
    /// n_squared != n*n au chargement : fichier corrompu ou falsifié
    KeyCoherenceError,

    // --- Erreurs symétriques ---
    /// Longueur de clé, d'IV ou de sortie refusée par la primitive
    InvalidLength { what: &'static str, actual: usize },
    /// Tag AES-GCM invalide
    AuthenticationFailed,

    InvalidInput(String), // Erreur générique pour les entrées invalides
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::MessageOutOfRange =>
                write!(f, "Le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange =>
                write!(f, "Le chiffré doit être dans [0, n²)"),
            CryptoError::RandomnessOutOfRange =>
                write!(f, "L'aléa r doit être dans [1, n)"),
            CryptoError::CiphertextNotInvertible =>
                write!(f, "Le chiffré n'est pas inversible modulo p² ou q²"),
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de clé {requested} bits invalide, minimum requis : {minimum} bits (multiple de 16)"),
            CryptoError::InvalidPrimes(msg) =>
                write!(f, "Premiers fournis invalides : {msg}"),
            CryptoError::NoModularInverse =>
                write!(f, "Impossible de calculer l'inverse modulaire (gcd != 1)"),
            CryptoError::DivisionByZero =>
                write!(f, "Division par zéro"),
            CryptoError::PrimeSearchExhausted { iterations } =>
                write!(f, "Aucun premier trouvé après {iterations} incréments"),
            CryptoError::RngFailure(msg) =>
                write!(f, "Échec du générateur aléatoire : {msg}"),
            CryptoError::OctetOverflow { needed, capacity } =>
                write!(f, "Dépassement de capacité : {needed} octets requis, capacité {capacity}"),
            CryptoError::HexParseError =>
                write!(f, "Parsing hexadécimal invalide"),
            CryptoError::Base64ParseError =>
                write!(f, "Parsing base64 invalide"),
            CryptoError::HexFieldTooLong { actual, maximum } =>
                write!(f, "Champ hexadécimal trop long : {actual} caractères (maximum autorisé : {maximum})"),
            CryptoError::KeyCoherenceError =>
                write!(f, "Fichier de clés incohérent : n_squared != n*n (corrompu ou falsifié)"),
            CryptoError::InvalidLength { what, actual } =>
                write!(f, "Longueur invalide pour {what} : {actual} octets"),
            CryptoError::AuthenticationFailed =>
                write!(f, "Tag d'authentification invalide"),
            CryptoError::InvalidInput(msg) =>
                write!(f, "Entrée invalide : {msg}"),
        }
    }
}

impl std::error::Error for CryptoError {}

impl From<rand_core::Error> for CryptoError {
    fn from(e: rand_core::Error) -> Self {
        CryptoError::RngFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_fields() {
        let e = CryptoError::OctetOverflow { needed: 40, capacity: 32 };
        let msg = e.to_string();
        assert!(msg.contains("40"));
        assert!(msg.contains("32"));
    }

    #[test]
    fn test_rng_error_converts() {
        let e: CryptoError = rand_core::Error::new("plus d'entropie").into();
        assert!(matches!(e, CryptoError::RngFailure(_)));
    }
}
