// Générateur aléatoire et tirages de grands entiers

pub mod csprng;
pub mod sample;

pub use csprng::Csprng;
pub use sample::{random_below, random_bits, random_range};
