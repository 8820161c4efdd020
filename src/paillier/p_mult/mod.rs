pub mod p_mult;

pub use p_mult::p_mult;
