// Réexporte toutes les fonctions mathématiques

mod math;

pub use math::{
    l_function, gcd, mod_inverse, wipe_biguint,
    generate_prime_3mod4, is_probable_prime,
};
