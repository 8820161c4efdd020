pub mod config;

pub use config::{PaillierConfig, KeyScheme, MIN_MODULUS_BITS};
