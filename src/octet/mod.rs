// Tampon d'octets à capacité fixe et ses codecs

pub mod octet;
mod codec;

pub use octet::Octet;
