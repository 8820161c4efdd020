// Déclaration des modules
pub mod crypto_error;
pub mod octet;
pub mod rng;
pub mod field;
pub mod config;
pub mod paillier;
pub mod key_management;
pub mod symmetric;

pub use crate::paillier::math;

// Opérations Paillier (chaque nom désigne aussi le module homonyme)
pub use crate::paillier::{
    p_keygen, p_keygen_from_primes, p_encrypt, p_encrypt_with_r, p_encrypt_expose_r,
    p_decrypt, p_add, p_mult,
};

// Types de clés
pub use crate::paillier::{PublicKey, PrivateKey, KeyPair};

// Tampon, aléa, largeurs, configuration
pub use octet::Octet;
pub use rng::Csprng;
pub use field::FieldSize;
pub use config::{PaillierConfig, KeyScheme};

// Erreur centralisée
pub use crypto_error::CryptoError;

// Registre de clés thread-safe : point d'entrée pour les serveurs multi-threadés
pub use key_management::{KeyRegistry, RegistryError};
