//! Deterministic short code encoding.
//!
//! Maps a numeric identifier to a fixed-length code over an ordered
//! alphabet. The encoder is a pure function: it holds no counters and
//! can be shared freely between threads.

mod alphabet;
mod encoder;
mod error;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use encoder::{Encoder, EncoderSettings, DEFAULT_LENGTH};
pub use error::EncoderError;
