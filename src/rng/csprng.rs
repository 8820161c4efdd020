use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRng, OsRng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;
use crate::octet::Octet;

// ============================================================================
// Csprng : générateur cryptographique ChaCha20
//
// Deux constructions :
//   - seed(&Octet)    : déterministe, la clé ChaCha20 est SHA-256(graine).
//                       Réservé à la reproduction des vecteurs de test.
//   - from_entropy()  : clé tirée de OsRng, chemin de production.
//
// destroy() consomme le générateur et écrase son état en place.
// ============================================================================
pub struct Csprng {
    inner: ChaCha20Rng,
}

impl Csprng {
    pub fn seed(seed: &Octet) -> Result<Self, CryptoError> {
        if seed.is_empty() {
            return Err(CryptoError::InvalidInput("graine vide".into()));
        }
        let digest = Sha256::digest(seed.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        let inner = ChaCha20Rng::from_seed(key);
        key.zeroize();
        Ok(Csprng { inner })
    }

    pub fn from_entropy() -> Result<Self, CryptoError> {
        let mut key = [0u8; 32];
        OsRng.try_fill_bytes(&mut key)?;
        let inner = ChaCha20Rng::from_seed(key);
        key.zeroize();
        Ok(Csprng { inner })
    }

    pub fn next_byte(&mut self) -> u8 {
        let mut b = [0u8; 1];
        self.inner.fill_bytes(&mut b);
        b[0]
    }

    pub fn destroy(mut self) {
        self.inner = ChaCha20Rng::from_seed([0u8; 32]);
    }
}

impl RngCore for Csprng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for Csprng {}
