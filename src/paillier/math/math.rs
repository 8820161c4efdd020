use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;
use log::debug;
use crate::crypto_error::CryptoError;
use crate::field::long_div;
use crate::rng::{random_bits, random_range};

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire, couvre jusqu'à 2999)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,1009,1013,1021,
   1031,1033,1039,1049,1051,1061,1063,1069,1087,1091,
   1093,1097,1103,1109,1117,1123,1129,1151,1153,1163,
   1171,1181,1187,1193,1201,1213,1217,1223,1229,1231,
   1237,1249,1259,1277,1279,1283,1289,1291,1297,1301,
   1303,1307,1319,1321,1327,1361,1367,1373,1381,1399,
   1409,1423,1427,1429,1433,1439,1447,1451,1453,1459,
   1471,1481,1483,1487,1489,1493,1499,1511,1523,1531,
   1543,1549,1553,1559,1567,1571,1579,1583,1597,1601,
   1607,1609,1613,1619,1621,1627,1637,1657,1663,1667,
   1669,1693,1697,1699,1709,1721,1723,1733,1741,1747,
   1753,1759,1777,1783,1787,1789,1801,1811,1823,1831,
   1847,1861,1867,1871,1873,1877,1879,1889,1901,1907,
   1913,1931,1933,1949,1951,1973,1979,1987,1993,1997,
   1999,2003,2011,2017,2027,2029,2039,2053,2063,2069,
   2081,2083,2087,2089,2099,2111,2113,2129,2131,2137,
   2141,2143,2153,2161,2179,2203,2207,2213,2221,2237,
   2239,2243,2251,2267,2269,2273,2281,2287,2293,2297,
   2309,2311,2333,2339,2341,2347,2351,2357,2371,2377,
   2381,2383,2389,2393,2399,2411,2417,2423,2437,2441,
   2447,2459,2467,2473,2477,2503,2521,2531,2539,2543,
   2549,2551,2557,2579,2591,2593,2609,2617,2621,2633,
   2647,2657,2659,2663,2671,2677,2683,2687,2689,2693,
   2699,2707,2711,2713,2719,2729,2731,2741,2749,2753,
   2767,2777,2789,2791,2797,2801,2803,2819,2833,2837,
   2843,2851,2857,2861,2879,2887,2897,2903,2909,2917,
   2927,2939,2953,2957,2963,2969,2971,2999,
];

// Fonction L(u) = (u-1)/n, division exacte par décalage-soustraction
pub fn l_function(u: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    if u.is_zero() {
        return Err(CryptoError::CiphertextNotInvertible);
    }
    let (quotient, _) = long_div(&(u - BigUint::one()), n)?;
    Ok(quotient)
}

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

// ---------------------------------------------------------------------------
// Effacement d'un BigUint en place
//
// Chaque bit est remis à zéro dans les limbs existants avant de
// réinitialiser la valeur. Une simple affectation libérerait le buffer sans
// l'écraser.
//
// Ordre : du poids faible au poids fort. Le limb de tête reste non nul
// jusqu'au dernier bit, BigUint ne renormalise donc pas (ni ne réalloue)
// tant qu'un limb secret subsiste.
// ---------------------------------------------------------------------------
pub fn wipe_biguint(x: &mut BigUint) {
    for bit in 0..x.bits() {
        x.set_bit(bit, false);
    }
    *x = BigUint::default();
}

// ---------------------------------------------------------------------------
// Premier p ≡ 3 (mod 4) d'exactement `nbits` bits
//
// Candidat aléatoire avec les deux bits de poids fort levés (le produit de
// deux tels premiers a exactement 2·nbits bits), incrémenté de 1 jusqu'à
// p ≡ 3 (mod 4), puis de 4 jusqu'à ce que le test de primalité passe.
// Le nombre total d'incréments est borné par `max_search` ; un candidat qui
// déborde de `nbits` bits est re-tiré.
// ---------------------------------------------------------------------------
pub fn generate_prime_3mod4<R: RngCore + ?Sized>(
    nbits: u64,
    rounds: u32,
    max_search: u32,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    if nbits < 8 {
        return Err(CryptoError::KeySizeTooSmall { requested: nbits, minimum: 8 });
    }

    let mut spent = 0u32;
    while spent < max_search {
        let mut candidate = random_bits(nbits, rng)?;
        candidate.set_bit(nbits - 1, true);
        candidate.set_bit(nbits - 2, true);

        while !(candidate.bit(0) && candidate.bit(1)) {
            candidate += 1u32;
        }

        while spent < max_search && candidate.bits() == nbits {
            if is_probable_prime(&candidate, rounds, rng)? {
                debug!("premier de {nbits} bits trouvé après {spent} incréments");
                return Ok(candidate);
            }
            candidate += 4u32;
            spent += 1;
        }
        wipe_biguint(&mut candidate);
    }

    Err(CryptoError::PrimeSearchExhausted { iterations: max_search })
}

// ---------------------------------------------------------------------------
// Crible par petits premiers
// Some(true) : n est lui-même un petit premier ; Some(false) : divisible.
// ---------------------------------------------------------------------------
fn small_prime_sieve(n: &BigUint) -> Option<bool> {
    for &sp in SMALL_PRIMES {
        let bp = BigUint::from(sp);
        if n == &bp {
            return Some(true);
        }
        if (n % &bp).is_zero() {
            return Some(false);
        }
    }
    None
}

pub fn is_probable_prime<R: RngCore + ?Sized>(
    n: &BigUint,
    rounds: u32,
    rng: &mut R,
) -> Result<bool, CryptoError> {
    if n <= &BigUint::one() { return Ok(false); }
    if n == &BigUint::from(2u32) { return Ok(true); }
    if n.is_even() { return Ok(false); }
    if let Some(verdict) = small_prime_sieve(n) {
        return Ok(verdict);
    }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    let two = BigUint::from(2u32);
    'witness: for _ in 0..rounds {
        let a = random_range(&two, &n_minus_1, rng)?;
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return Ok(false);
    }
    Ok(true)
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a,n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    if n.is_zero() {
        return Err(CryptoError::DivisionByZero);
    }
    let (g, x, _) = extended_gcd(a, n);
    if !g.is_one() {
        return Err(CryptoError::NoModularInverse);
    }

    let n_big = BigInt::from(n.clone());
    let mut x_mod = x % &n_big;
    if x_mod < BigInt::zero() {
        x_mod += &n_big;
    }

    x_mod.to_biguint().ok_or(CryptoError::NoModularInverse)
}

fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let temp_r = r.clone();
        r = old_r - &quotient * &r;
        old_r = temp_r;

        let temp_s = s.clone();
        s = old_s - &quotient * &s;
        old_s = temp_s;

        let temp_t = t.clone();
        t = old_t - &quotient * &t;
        old_t = temp_t;
    }

    let gcd_val = old_r.to_biguint().unwrap_or_default();

    (gcd_val, old_s, old_t)
}
