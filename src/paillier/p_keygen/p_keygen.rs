use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;
use log::{debug, trace};
use crate::config::{KeyScheme, PaillierConfig};
use crate::crypto_error::CryptoError;
use crate::field::{from_octet, inv_mod_pow2, promote, to_octet, FieldSize};
use crate::octet::Octet;
use crate::paillier::math::{gcd, generate_prime_3mod4, is_probable_prime, mod_inverse, wipe_biguint};
use crate::rng::Csprng;

// ============================================================================
// Clé publique Paillier : pas de données secrètes, pas de zeroize nécessaire
//
// g = n+1 et n² sont toujours recalculés à partir de n : une clé publique
// ne peut pas être construite dans un état incohérent.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub n:         BigUint,
    pub g:         BigUint,
    pub n_squared: BigUint,
    /// Largeur du module ; les chiffrés vivent à `size.double()`
    pub size:      FieldSize,
}

impl PublicKey {
    pub fn from_modulus(n: BigUint, size: FieldSize) -> Result<Self, CryptoError> {
        if n.is_even() || n <= BigUint::one() {
            return Err(CryptoError::InvalidInput("module n pair ou trop petit".into()));
        }
        if n.bits() > size.bits() {
            return Err(CryptoError::OctetOverflow {
                needed:   ((n.bits() + 7) / 8) as usize,
                capacity: size.bytes(),
            });
        }
        let g = &n + BigUint::one();
        let n_squared = &n * &n;
        Ok(PublicKey { n, g, n_squared, size })
    }

    /// n sérialisé à la largeur du module
    pub fn to_octet(&self) -> Result<Octet, CryptoError> {
        to_octet(&self.n, self.size)
    }

    pub fn from_octet(oct: &Octet, size: FieldSize) -> Result<Self, CryptoError> {
        let n = from_octet(oct, size)?;
        PublicKey::from_modulus(n, size)
    }

    // -----------------------------------------------------------------------
    // Lecture des opérandes avec contrôle de domaine
    //
    // Le clair (largeur du module) est promu à la largeur des chiffrés avant
    // d'être relu : toutes les opérations se font ensuite dans l'espace n².
    // -----------------------------------------------------------------------
    pub(crate) fn lift_plaintext(&self, pt: &Octet) -> Result<BigUint, CryptoError> {
        let wide = promote(pt, self.size, self.size.double())?;
        let m = from_octet(&wide, self.size.double())?;
        if m >= self.n {
            return Err(CryptoError::MessageOutOfRange);
        }
        Ok(m)
    }

    pub(crate) fn lift_ciphertext(&self, ct: &Octet) -> Result<BigUint, CryptoError> {
        let c = from_octet(ct, self.size.double())?;
        if c >= self.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        Ok(c)
    }
}

// ============================================================================
// Clé privée, schéma simple : λ = (p−1)(q−1), μ = λ⁻¹ mod n
// ============================================================================
#[derive(Clone)]
pub struct PlainKey {
    pub(crate) public: PublicKey,
    pub(crate) lambda: BigUint,
    pub(crate) mu:     BigUint,
}

impl PlainKey {
    // λ = (p−1)(q−1), μ = λ⁻¹ mod n ; p et q sont effacés
    pub(crate) fn from_primes(public: PublicKey, mut p: BigUint, mut q: BigUint) -> Result<Self, CryptoError> {
        let mut lp = &p - BigUint::one();
        let mut lq = &q - BigUint::one();
        let mut lambda = &lp * &lq;
        for tmp in [&mut lp, &mut lq, &mut p, &mut q] {
            wipe_biguint(tmp);
        }
        let mu = match mod_inverse(&lambda, &public.n) {
            Ok(mu) => mu,
            Err(e) => {
                wipe_biguint(&mut lambda);
                return Err(e);
            }
        };
        Ok(PlainKey { public, lambda, mu })
    }

    /// Reconstruction depuis un stockage : λ·μ ≡ 1 (mod n) est exigé
    pub(crate) fn from_parts(public: PublicKey, lambda: BigUint, mu: BigUint) -> Result<Self, CryptoError> {
        let key = PlainKey { public, lambda, mu };
        if !((&key.lambda * &key.mu) % &key.public.n).is_one() {
            return Err(CryptoError::KeyCoherenceError);
        }
        Ok(key)
    }
}

impl Zeroize for PlainKey {
    fn zeroize(&mut self) {
        wipe_biguint(&mut self.lambda);
        wipe_biguint(&mut self.mu);
    }
}

impl Drop for PlainKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Clé privée, schéma CRT
//
//   lp = p−1, lq = q−1, p2 = p², q2 = q²
//   mp = −q⁻¹ mod p, mq = −p⁻¹ mod q
//   invp = p⁻¹ mod 2^m, invq = q⁻¹ mod 2^m  (m = largeur du module)
//   invpq = p⁻¹ mod q                       (recombinaison CRT)
// ============================================================================
#[derive(Clone)]
pub struct CrtKey {
    pub(crate) public: PublicKey,
    pub(crate) p:      BigUint,
    pub(crate) q:      BigUint,
    pub(crate) lp:     BigUint,
    pub(crate) lq:     BigUint,
    pub(crate) p2:     BigUint,
    pub(crate) q2:     BigUint,
    pub(crate) mp:     BigUint,
    pub(crate) mq:     BigUint,
    pub(crate) invp:   BigUint,
    pub(crate) invq:   BigUint,
    pub(crate) invpq:  BigUint,
}

impl CrtKey {
    pub(crate) fn from_primes(public: PublicKey, mut p: BigUint, mut q: BigUint) -> Result<Self, CryptoError> {
        if &p * &q != public.n {
            wipe_biguint(&mut p);
            wipe_biguint(&mut q);
            return Err(CryptoError::KeyCoherenceError);
        }
        let width = public.size.bits();

        // Remplie champ par champ : sur erreur, Drop efface ce qui est déjà calculé
        let mut key = CrtKey {
            public, p, q,
            lp: BigUint::zero(), lq: BigUint::zero(),
            p2: BigUint::zero(), q2: BigUint::zero(),
            mp: BigUint::zero(), mq: BigUint::zero(),
            invp: BigUint::zero(), invq: BigUint::zero(), invpq: BigUint::zero(),
        };
        key.lp = &key.p - BigUint::one();
        key.lq = &key.q - BigUint::one();
        key.p2 = &key.p * &key.p;
        key.q2 = &key.q * &key.q;

        // mp = −q⁻¹ mod p ; invpq sert aussi à mq = −p⁻¹ mod q
        let mut inv_q_mod_p = mod_inverse(&key.q, &key.p)?;
        key.mp = &key.p - &inv_q_mod_p;
        wipe_biguint(&mut inv_q_mod_p);
        key.invpq = mod_inverse(&key.p, &key.q)?;
        key.mq = &key.q - &key.invpq;

        key.invp = inv_mod_pow2(&key.p, width)?;
        key.invq = inv_mod_pow2(&key.q, width)?;

        Ok(key)
    }
}

impl Zeroize for CrtKey {
    fn zeroize(&mut self) {
        for secret in [
            &mut self.p, &mut self.q, &mut self.lp, &mut self.lq,
            &mut self.p2, &mut self.q2, &mut self.mp, &mut self.mq,
            &mut self.invp, &mut self.invq, &mut self.invpq,
        ] {
            wipe_biguint(secret);
        }
    }
}

impl Drop for CrtKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// PrivateKey : ZEROISÉE À LA DESTRUCTION
// ============================================================================
#[derive(Clone)]
pub enum PrivateKey {
    Plain(PlainKey),
    Crt(CrtKey),
}

impl PrivateKey {
    pub fn public_key(&self) -> &PublicKey {
        match self {
            PrivateKey::Plain(k) => &k.public,
            PrivateKey::Crt(k) => &k.public,
        }
    }

    pub fn scheme(&self) -> KeyScheme {
        match self {
            PrivateKey::Plain(_) => KeyScheme::Plain,
            PrivateKey::Crt(_) => KeyScheme::Crt,
        }
    }

    /// Efface tous les secrets en place. La clé reste allouée mais
    /// p_decrypt la refuse ensuite.
    pub fn kill(&mut self) {
        self.zeroize();
    }

    pub fn is_destroyed(&self) -> bool {
        match self {
            PrivateKey::Plain(k) => k.lambda.is_zero(),
            PrivateKey::Crt(k) => k.p.is_zero(),
        }
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        match self {
            PrivateKey::Plain(k) => k.zeroize(),
            PrivateKey::Crt(k) => k.zeroize(),
        }
    }
}

// Aucun secret dans la sortie Debug
impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("scheme", &self.scheme())
            .field("size", &self.public_key().size)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

// ============================================================================
// Paire de clés
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub public_key:  PublicKey,
    pub private_key: PrivateKey,
}

impl KeyPair {
    // -----------------------------------------------------------------------
    // Cohérence de la paire : n = p·q, g = n+1, n² = n·n, λ·μ ≡ 1 (mod n),
    // et chaque dérivé CRT recalculé à partir de p et q.
    // -----------------------------------------------------------------------
    pub fn validate(&self) -> Result<(), CryptoError> {
        let pk = &self.public_key;
        if pk.g != &pk.n + BigUint::one() || pk.n_squared != &pk.n * &pk.n {
            return Err(CryptoError::KeyCoherenceError);
        }
        if self.private_key.public_key() != pk {
            return Err(CryptoError::KeyCoherenceError);
        }
        if self.private_key.is_destroyed() {
            return Err(CryptoError::InvalidInput("clé privée détruite".into()));
        }

        let coherent = match &self.private_key {
            PrivateKey::Plain(k) => ((&k.lambda * &k.mu) % &pk.n).is_one(),
            PrivateKey::Crt(k) => {
                let one = BigUint::one();
                let mask = (BigUint::one() << pk.size.bits()) - 1u32;
                &k.p * &k.q == pk.n
                    && k.lp == &k.p - &one
                    && k.lq == &k.q - &one
                    && k.p2 == &k.p * &k.p
                    && k.q2 == &k.q * &k.q
                    && ((&k.mp * &k.q) + &one) % &k.p == BigUint::zero()
                    && ((&k.mq * &k.p) + &one) % &k.q == BigUint::zero()
                    && ((&k.invpq * &k.p) % &k.q).is_one()
                    && ((&k.invp * &k.p) & &mask).is_one()
                    && ((&k.invq * &k.q) & &mask).is_one()
            }
        };
        if coherent { Ok(()) } else { Err(CryptoError::KeyCoherenceError) }
    }
}

// ============================================================================
// Assemblage de la paire à partir de deux premiers distincts
//
// g = n+1 : (n+1)^m mod n² = 1 + m·n, ce qui permet à p_encrypt d'éviter
// une exponentiation pour le terme g^m.
// ============================================================================
fn assemble_keypair(
    mut p: BigUint,
    mut q: BigUint,
    size: FieldSize,
    scheme: KeyScheme,
) -> Result<KeyPair, CryptoError> {
    let public = match PublicKey::from_modulus(&p * &q, size) {
        Ok(public) => public,
        Err(e) => {
            wipe_biguint(&mut p);
            wipe_biguint(&mut q);
            return Err(e);
        }
    };
    trace!("module de {} bits, chiffrés sur {}", public.n.bits(), size.double());

    let private_key = match scheme {
        KeyScheme::Plain => PrivateKey::Plain(PlainKey::from_primes(public.clone(), p, q)?),
        KeyScheme::Crt => PrivateKey::Crt(CrtKey::from_primes(public.clone(), p, q)?),
    };

    Ok(KeyPair { public_key: public, private_key })
}

// Tirages de q consécutifs égaux à p avant d'abandonner
const MAX_DUPLICATE_PRIMES: u32 = 8;

// ---------------------------------------------------------------------------
// Tire q ≠ p. Sur échec, p est effacé avant de rendre l'erreur.
// ---------------------------------------------------------------------------
fn draw_distinct_prime<F>(p: &mut BigUint, mut draw: F) -> Result<BigUint, CryptoError>
where
    F: FnMut() -> Result<BigUint, CryptoError>,
{
    for _ in 0..MAX_DUPLICATE_PRIMES {
        match draw() {
            Ok(q) if q != *p => return Ok(q),
            Ok(mut duplicate) => wipe_biguint(&mut duplicate),
            Err(e) => {
                wipe_biguint(p);
                return Err(e);
            }
        }
    }
    wipe_biguint(p);
    Err(CryptoError::RngFailure(format!("{MAX_DUPLICATE_PRIMES} tirages de q égaux à p")))
}

// ============================================================================
// Génération de clés Paillier
//
// p et q : premiers ≡ 3 (mod 4) de size/2 bits, tirés par `rng`.
// La recherche est bornée par config.max_prime_search incréments.
// ============================================================================
pub fn p_keygen<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    config: &PaillierConfig,
) -> Result<KeyPair, CryptoError> {
    let size = config.field_size()?;
    let half = size.half();
    debug!("génération d'une clé Paillier de {} bits, schéma {:?}", size.bits(), config.scheme);

    let rounds = config.miller_rabin_rounds;
    let mut p = generate_prime_3mod4(half.bits(), rounds, config.max_prime_search, rng)?;
    let q = draw_distinct_prime(&mut p, || {
        generate_prime_3mod4(half.bits(), rounds, config.max_prime_search, &mut *rng)
    })?;

    assemble_keypair(p, q, size, config.scheme)
}

// ============================================================================
// Génération à partir de premiers fournis (reproduction de vecteurs de test)
//
// p et q sont lus à la largeur size/2. Ils doivent être impairs, distincts,
// premiers, et n = p·q doit tenir dans la largeur du module.
// ============================================================================
pub fn p_keygen_from_primes(
    p: &Octet,
    q: &Octet,
    config: &PaillierConfig,
) -> Result<KeyPair, CryptoError> {
    let size = config.field_size()?;
    let half = size.half();

    let mut p = from_octet(p, half)
        .map_err(|_| CryptoError::InvalidPrimes(format!("p dépasse {} bits", half.bits())))?;
    let mut q = from_octet(q, half)
        .map_err(|_| CryptoError::InvalidPrimes(format!("q dépasse {} bits", half.bits())))?;

    let verdict = check_supplied_primes(&p, &q, size, config.miller_rabin_rounds);
    if let Err(e) = verdict {
        wipe_biguint(&mut p);
        wipe_biguint(&mut q);
        return Err(e);
    }
    debug!("clé Paillier de {} bits à partir de premiers fournis, schéma {:?}", size.bits(), config.scheme);

    assemble_keypair(p, q, size, config.scheme)
}

fn check_supplied_primes(
    p: &BigUint,
    q: &BigUint,
    size: FieldSize,
    rounds: u32,
) -> Result<(), CryptoError> {
    let three = BigUint::from(3u32);
    if p < &three || q < &three || p.is_even() || q.is_even() {
        return Err(CryptoError::InvalidPrimes("p et q doivent être impairs et >= 3".into()));
    }
    if p == q {
        return Err(CryptoError::InvalidPrimes("p == q".into()));
    }
    if (p * q).bits() > size.bits() {
        return Err(CryptoError::InvalidPrimes(format!("p·q dépasse {} bits", size.bits())));
    }

    let mut rng = Csprng::from_entropy()?;
    let primes = is_probable_prime(p, rounds, &mut rng)? && is_probable_prime(q, rounds, &mut rng)?;
    rng.destroy();
    if !primes {
        return Err(CryptoError::InvalidPrimes("p ou q composé".into()));
    }

    let phi = (p - BigUint::one()) * (q - BigUint::one());
    if !gcd(&(p * q), &phi).is_one() {
        return Err(CryptoError::InvalidPrimes("gcd(n, (p−1)(q−1)) != 1".into()));
    }
    Ok(())
}
