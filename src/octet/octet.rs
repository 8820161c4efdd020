use rand_core::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;
use crate::crypto_error::CryptoError;

// ============================================================================
// Octet : tampon d'octets à capacité fixe, longueur suivie
//
// La capacité est fixée à la construction (val.len()) et ne grandit jamais.
// Politique de dépassement : ÉCHEC EXPLICITE. Toute écriture qui dépasserait
// la capacité renvoie Err(OctetOverflow) et laisse le tampon inchangé.
// ============================================================================
#[derive(Clone)]
pub struct Octet {
    len: usize,
    val: Vec<u8>,
}

impl Octet {
    /// Tampon vide de capacité `capacity`
    pub fn new(capacity: usize) -> Self {
        Octet { len: 0, val: vec![0u8; capacity] }
    }

    /// Tampon plein : capacité = longueur = bytes.len()
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Octet { len: bytes.len(), val: bytes.to_vec() }
    }

    pub fn with_capacity_from(capacity: usize, bytes: &[u8]) -> Result<Self, CryptoError> {
        let mut o = Octet::new(capacity);
        o.append_bytes(bytes)?;
        Ok(o)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.val.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.val[..self.len]
    }

    fn ensure_room(&self, extra: usize) -> Result<(), CryptoError> {
        let needed = self.len + extra;
        if needed > self.capacity() {
            return Err(CryptoError::OctetOverflow { needed, capacity: self.capacity() });
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Copie : efface d'abord le tampon entier, puis copie x
    // -----------------------------------------------------------------------
    pub fn copy_from(&mut self, x: &Octet) -> Result<(), CryptoError> {
        if x.len > self.capacity() {
            return Err(CryptoError::OctetOverflow { needed: x.len, capacity: self.capacity() });
        }
        self.clear();
        self.val[..x.len].copy_from_slice(x.as_bytes());
        self.len = x.len;
        Ok(())
    }

    pub fn append_bytes(&mut self, b: &[u8]) -> Result<(), CryptoError> {
        self.ensure_room(b.len())?;
        self.val[self.len..self.len + b.len()].copy_from_slice(b);
        self.len += b.len();
        Ok(())
    }

    pub fn append_octet(&mut self, x: &Octet) -> Result<(), CryptoError> {
        self.append_bytes(x.as_bytes())
    }

    pub fn append_str(&mut self, s: &str) -> Result<(), CryptoError> {
        self.append_bytes(s.as_bytes())
    }

    /// Ajoute `rep` fois l'octet `ch`
    pub fn append_byte(&mut self, ch: u8, rep: usize) -> Result<(), CryptoError> {
        self.ensure_room(rep)?;
        self.val[self.len..self.len + rep].fill(ch);
        self.len += rep;
        Ok(())
    }

    /// Ajoute `x` en big-endian sur exactement `len` octets
    pub fn append_int(&mut self, x: u64, len: usize) -> Result<(), CryptoError> {
        if len == 0 {
            return Err(CryptoError::InvalidInput("longueur d'entier nulle".into()));
        }
        if len < 8 && (x >> (8 * len)) != 0 {
            return Err(CryptoError::InvalidInput(format!("{x} ne tient pas sur {len} octets")));
        }
        self.ensure_room(len)?;
        let be = x.to_be_bytes();
        let start = self.len;
        self.val[start..start + len].fill(0);
        let take = len.min(8);
        self.val[start + len - take..start + len].copy_from_slice(&be[8 - take..]);
        self.len += len;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Bourrage à gauche avec des zéros jusqu'à la longueur n
    // Échoue si n < len ou n > capacité
    // -----------------------------------------------------------------------
    pub fn pad(&mut self, n: usize) -> Result<(), CryptoError> {
        if n > self.capacity() {
            return Err(CryptoError::OctetOverflow { needed: n, capacity: self.capacity() });
        }
        if n < self.len {
            return Err(CryptoError::InvalidInput(format!(
                "bourrage à {n} octets plus court que la longueur {}", self.len
            )));
        }
        let d = n - self.len;
        if d > 0 {
            self.val.copy_within(0..self.len, d);
            self.val[..d].fill(0);
            self.len = n;
        }
        Ok(())
    }

    /// Longueur à zéro, contenu conservé jusqu'au prochain effacement
    pub fn empty(&mut self) {
        self.len = 0;
    }

    /// Efface toute la capacité (effacement des secrets)
    pub fn clear(&mut self) {
        self.zeroize();
    }

    // -----------------------------------------------------------------------
    // Comparaison en temps constant
    //
    // Longueurs différentes → inégalité immédiate, sans lire le contenu.
    // Sinon OU des XOR sur toute la longueur (subtle), pas de sortie anticipée.
    // -----------------------------------------------------------------------
    pub fn ct_eq(&self, other: &Octet) -> bool {
        if self.len != other.len {
            return false;
        }
        bool::from(self.as_bytes().ct_eq(other.as_bytes()))
    }

    /// Compare les `n` premiers octets en temps constant
    pub fn ct_eq_prefix(&self, other: &Octet, n: usize) -> bool {
        if n > self.len || n > other.len {
            return false;
        }
        bool::from(self.val[..n].ct_eq(&other.val[..n]))
    }

    /// XOR des octets communs de x dans self
    pub fn xor(&mut self, x: &Octet) {
        for (a, b) in self.val[..self.len].iter_mut().zip(x.as_bytes()) {
            *a ^= *b;
        }
    }

    pub fn xor_byte(&mut self, m: u8) {
        for a in self.val[..self.len].iter_mut() {
            *a ^= m;
        }
    }

    /// Décale de n octets vers la gauche ; les n premiers disparaissent
    pub fn shift_left(&mut self, n: usize) {
        let old = self.len;
        if n >= old {
            self.val[..old].fill(0);
            self.len = 0;
            return;
        }
        self.val.copy_within(n..old, 0);
        self.len = old - n;
        self.val[self.len..old].fill(0);
    }

    // -----------------------------------------------------------------------
    // Tronque à n octets et renvoie la queue dans un nouvel Octet
    // -----------------------------------------------------------------------
    pub fn chop(&mut self, n: usize) -> Octet {
        if n >= self.len {
            return Octet::new(0);
        }
        let tail = Octet::from_bytes(&self.val[n..self.len]);
        self.val[n..self.len].fill(0);
        self.len = n;
        tail
    }

    /// Extrait les n derniers octets (octets de poids faible en big-endian)
    pub fn suffix(&self, n: usize) -> Result<Octet, CryptoError> {
        if n > self.len {
            return Err(CryptoError::InvalidInput(format!(
                "suffixe de {n} octets demandé sur {} octets", self.len
            )));
        }
        Ok(Octet::from_bytes(&self.val[self.len - n..self.len]))
    }

    // -----------------------------------------------------------------------
    // Remplit avec `len` octets aléatoires (remplace le contenu)
    // -----------------------------------------------------------------------
    pub fn random<R: RngCore + ?Sized>(&mut self, rng: &mut R, len: usize) -> Result<(), CryptoError> {
        if len > self.capacity() {
            return Err(CryptoError::OctetOverflow { needed: len, capacity: self.capacity() });
        }
        self.clear();
        rng.try_fill_bytes(&mut self.val[..len])?;
        self.len = len;
        Ok(())
    }
}

impl Zeroize for Octet {
    fn zeroize(&mut self) {
        self.val[..].zeroize();
        self.len = 0;
    }
}

impl Drop for Octet {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// Égalité en temps constant : utilisable directement dans assert_eq!
impl PartialEq for Octet {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}

impl Eq for Octet {}

// Le contenu n'est jamais affiché : un Octet peut porter un secret
impl std::fmt::Debug for Octet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Octet")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}
