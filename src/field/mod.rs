// Largeurs de travail, sérialisation à largeur fixe, division longue,
// inverse modulo 2^m et exponentiation à nombre de tours fixe

pub mod field_size;
pub mod marshal;
pub mod long_div;
pub mod arith;

pub use field_size::FieldSize;
pub use marshal::{to_octet, from_octet, promote, truncate};
pub use long_div::long_div;
pub use arith::{inv_mod_pow2, ct_pow};
