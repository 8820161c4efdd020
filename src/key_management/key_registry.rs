// ============================================================================
// KeyRegistry : registre de clés partagé entre threads
//
// La clé publique est immuable après génération : elle est clonée vers
// chaque lecteur. La clé privée ne quitte jamais le registre, elle est
// prêtée à une closure sous verrou de lecture.
//
// Arc<RwLock<Option<KeyPair>>> :
//   - Arc       : registre clonable entre threads
//   - RwLock    : lectures concurrentes (chiffrement, déchiffrement),
//                 écriture exclusive (rotation, destruction)
//   - Option    : "aucune clé chargée" distinct de "clé chargée"
//
// clear_keypair() prend le verrou d'écriture : aucune closure de
// with_private_key ne peut être en cours pendant l'effacement.
// ============================================================================

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use log::debug;
use crate::paillier::p_keygen::{PublicKey, PrivateKey, KeyPair};
use crate::crypto_error::CryptoError;

// ============================================================================
// Erreurs spécifiques au registre
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Aucune clé Paillier n'a encore été chargée dans le registre
    NoPaillierKey,
    /// Le verrou RwLock est empoisonné (thread paniqué pendant un accès exclusif)
    LockPoisoned,
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NoPaillierKey =>
                write!(f, "Aucune clé Paillier chargée dans le registre"),
            RegistryError::LockPoisoned =>
                write!(f, "Verrou du registre empoisonné, redémarrage requis"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<RegistryError> for CryptoError {
    fn from(e: RegistryError) -> Self {
        CryptoError::InvalidInput(e.to_string())
    }
}

struct RegistryState {
    keypair: Option<KeyPair>,
}

#[derive(Clone)]
pub struct KeyRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        KeyRegistry {
            inner: Arc::new(RwLock::new(RegistryState { keypair: None })),
        }
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    // -----------------------------------------------------------------------
    // Chargement / rotation de la paire de clés
    //
    // L'ancienne paire, s'il y en a une, est effacée sous le verrou.
    // -----------------------------------------------------------------------
    pub fn set_keypair(&self, kp: KeyPair) -> Result<(), RegistryError> {
        let mut guard = self.write()?;
        if let Some(mut old) = guard.keypair.replace(kp) {
            old.private_key.kill();
        }
        debug!("paire de clés chargée dans le registre");
        Ok(())
    }

    /// Retire la paire et efface la clé privée
    pub fn clear_keypair(&self) -> Result<(), RegistryError> {
        let mut guard = self.write()?;
        if let Some(mut old) = guard.keypair.take() {
            old.private_key.kill();
            debug!("paire de clés retirée du registre");
        }
        Ok(())
    }

    // Clone de la clé publique : aucune donnée secrète
    pub fn public_key(&self) -> Result<PublicKey, RegistryError> {
        let guard = self.read()?;
        guard.keypair
            .as_ref()
            .map(|kp| kp.public_key.clone())
            .ok_or(RegistryError::NoPaillierKey)
    }

    // -----------------------------------------------------------------------
    // Prêt de la clé privée sans clonage
    //
    // Usage typique :
    //   let pt = registry.with_private_key(|sk| p_decrypt(sk, &ct))??;
    // -----------------------------------------------------------------------
    pub fn with_private_key<F, T>(&self, f: F) -> Result<T, RegistryError>
    where
        F: FnOnce(&PrivateKey) -> T,
    {
        let guard = self.read()?;
        guard.keypair
            .as_ref()
            .map(|kp| f(&kp.private_key))
            .ok_or(RegistryError::NoPaillierKey)
    }

    pub fn has_keypair(&self) -> bool {
        self.read().map(|g| g.keypair.is_some()).unwrap_or(false)
    }
}

impl Default for KeyRegistry {
    fn default() -> Self { Self::new() }
}

// ============================================================================
// Tests unitaires du registre
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use num_bigint::BigUint;
    use crate::config::KeyScheme;
    use crate::field::{from_octet, to_octet};
    use crate::paillier::{p_decrypt, p_encrypt_with_r, test_keypair};

    #[test]
    fn test_registry_empty_returns_err() {
        let reg = KeyRegistry::new();
        assert!(matches!(reg.public_key(), Err(RegistryError::NoPaillierKey)));
        assert!(!reg.has_keypair());
        assert!(reg.clear_keypair().is_ok());
    }

    #[test]
    fn test_registry_set_and_get() {
        let reg = KeyRegistry::new();
        let kp = test_keypair(KeyScheme::Crt);
        let expected = kp.public_key.clone();
        reg.set_keypair(kp).unwrap();
        assert_eq!(reg.public_key().unwrap(), expected);
        assert!(reg.has_keypair());
    }

    #[test]
    fn test_registry_clear() {
        let reg = KeyRegistry::new();
        reg.set_keypair(test_keypair(KeyScheme::Plain)).unwrap();
        reg.clear_keypair().unwrap();
        assert!(matches!(reg.public_key(), Err(RegistryError::NoPaillierKey)));
        assert!(matches!(reg.with_private_key(|_| ()), Err(RegistryError::NoPaillierKey)));
    }

    #[test]
    fn test_concurrent_decryption_through_registry() {
        let reg = KeyRegistry::new();
        reg.set_keypair(test_keypair(KeyScheme::Crt)).unwrap();
        let pk = reg.public_key().unwrap();

        let handles: Vec<_> = (1..=8u32).map(|i| {
            let r = reg.clone();
            let pk = pk.clone();
            thread::spawn(move || {
                let pt = to_octet(&BigUint::from(i * 1000), pk.size).unwrap();
                let rand = to_octet(&BigUint::from(i + 1), pk.size).unwrap();
                let ct = p_encrypt_with_r(&pk, &pt, &rand).unwrap();
                let back = r.with_private_key(|sk| p_decrypt(sk, &ct)).unwrap().unwrap();
                assert_eq!(from_octet(&back, pk.size).unwrap(), BigUint::from(i * 1000));
            })
        }).collect();

        for h in handles { h.join().unwrap(); }
    }

    #[test]
    fn test_registry_error_converts() {
        let e: CryptoError = RegistryError::NoPaillierKey.into();
        assert!(matches!(e, CryptoError::InvalidInput(_)));
    }
}
