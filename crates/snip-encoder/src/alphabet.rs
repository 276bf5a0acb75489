use crate::error::EncoderError;
use snip_core::ShortCode;

/// The default symbol order. A symbol's position is its digit value.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890_";

/// An ordered set of unique ASCII symbols used as base-N digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Box<[u8]>,
}

impl Alphabet {
    /// Creates an alphabet from `symbols`, in digit order.
    ///
    /// Requires at least two symbols, no duplicates, and only characters
    /// that are valid in a [`ShortCode`].
    pub fn new(symbols: impl AsRef<str>) -> Result<Self, EncoderError> {
        let symbols = symbols.as_ref();

        if let Some(c) = symbols.chars().find(|&c| !ShortCode::is_valid_char(c)) {
            return Err(EncoderError::InvalidAlphabet(format!(
                "symbol '{}' is not allowed in a short code",
                c
            )));
        }

        let bytes = symbols.as_bytes();
        if bytes.len() < 2 {
            return Err(EncoderError::InvalidAlphabet(format!(
                "at least 2 symbols are required, got {}",
                bytes.len()
            )));
        }

        for (i, b) in bytes.iter().enumerate() {
            if bytes[..i].contains(b) {
                return Err(EncoderError::InvalidAlphabet(format!(
                    "duplicate symbol '{}'",
                    *b as char
                )));
            }
        }

        Ok(Self {
            symbols: bytes.into(),
        })
    }

    /// Number of symbols, i.e. the numeric base.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol for digit value `digit`.
    ///
    /// # Panics
    ///
    /// Panics if `digit >= self.len()`.
    pub fn symbol(&self, digit: usize) -> char {
        self.symbols[digit] as char
    }

    /// Returns the digit value of `symbol`, if it belongs to the alphabet.
    pub fn digit(&self, symbol: char) -> Option<usize> {
        if !symbol.is_ascii() {
            return None;
        }
        self.symbols.iter().position(|&b| b as char == symbol)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.as_bytes().into(),
        }
    }
}
