use thiserror::Error;

/// Errors returned by encoder construction, encoding and decoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncoderError {
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("invalid code length {0}; expected at least 1")]
    InvalidLength(usize),
    #[error("alphabet of {symbols} symbols with length {length} exceeds the supported range")]
    BiasOverflow { symbols: usize, length: usize },
    #[error("identifier {value} is out of range; maximum supported value is {max}")]
    OutOfRange { value: u64, max: u64 },
    #[error("invalid code '{code}': {reason}")]
    InvalidCode { code: String, reason: String },
}
