use crate::alphabet::Alphabet;
use crate::error::EncoderError;
use snip_core::ShortCode;
use typed_builder::TypedBuilder;

/// Number of characters in a code produced with default settings.
pub const DEFAULT_LENGTH: usize = 10;

/// Configures an [`Encoder`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct EncoderSettings {
    /// Digit symbols in value order.
    #[builder(default)]
    pub alphabet: Alphabet,
    /// Exact number of characters of every produced code.
    #[builder(default = DEFAULT_LENGTH)]
    pub length: usize,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Fixed-width positional encoder.
///
/// An identifier `n` is offset by the bias `alphabet.len() ^ length` and
/// the lowest `length` base-N digits of `n + bias` are written most
/// significant first. The bias guarantees the width; the iteration count
/// is what bounds it.
///
/// The supported domain is `0..=max_value()`, which for the defaults is
/// `63^10 - 1 = 984_930_291_881_790_848`. Larger identifiers would wrap
/// onto codes already used by smaller ones, so they are rejected.
#[derive(Debug, Clone)]
pub struct Encoder {
    alphabet: Alphabet,
    length: usize,
    bias: u128,
}

impl Encoder {
    /// Creates an encoder, computing the bias once.
    pub fn new(settings: EncoderSettings) -> Result<Self, EncoderError> {
        let EncoderSettings { alphabet, length } = settings;

        if length == 0 {
            return Err(EncoderError::InvalidLength(length));
        }

        let overflow = || EncoderError::BiasOverflow {
            symbols: alphabet.len(),
            length,
        };
        let exponent = u32::try_from(length).map_err(|_| overflow())?;
        let bias = (alphabet.len() as u128)
            .checked_pow(exponent)
            .ok_or_else(overflow)?;
        // `n + bias` must not overflow for any `n < bias`.
        bias.checked_mul(2).ok_or_else(overflow)?;

        Ok(Self {
            alphabet,
            length,
            bias,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// The largest identifier this encoder maps to a unique code.
    pub fn max_value(&self) -> u64 {
        u64::try_from(self.bias - 1).unwrap_or(u64::MAX)
    }

    /// Encodes `n` into a code of exactly [`length`](Self::length) symbols.
    pub fn encode(&self, n: u64) -> Result<ShortCode, EncoderError> {
        if u128::from(n) >= self.bias {
            return Err(EncoderError::OutOfRange {
                value: n,
                max: self.max_value(),
            });
        }

        let base = self.alphabet.len() as u128;
        let mut index = u128::from(n) + self.bias;
        let mut digits = vec![0usize; self.length];

        for slot in digits.iter_mut().rev() {
            *slot = (index % base) as usize;
            index /= base;
        }

        let code: String = digits
            .into_iter()
            .map(|digit| self.alphabet.symbol(digit))
            .collect();

        Ok(ShortCode::new_unchecked(code))
    }

    /// Recovers the identifier a code was produced from.
    pub fn decode(&self, code: &str) -> Result<u64, EncoderError> {
        let invalid = |reason: String| EncoderError::InvalidCode {
            code: code.to_string(),
            reason,
        };

        let count = code.chars().count();
        if count != self.length {
            return Err(invalid(format!(
                "expected {} symbols, got {}",
                self.length, count
            )));
        }

        let base = self.alphabet.len() as u128;
        let mut value: u128 = 0;
        for c in code.chars() {
            let digit = self
                .alphabet
                .digit(c)
                .ok_or_else(|| invalid(format!("symbol '{}' is not in the alphabet", c)))?;
            value = value * base + digit as u128;
        }

        u64::try_from(value).map_err(|_| invalid("value exceeds 64 bits".to_string()))
    }
}

impl Default for Encoder {
    fn default() -> Self {
        let alphabet = Alphabet::default();
        let bias = (alphabet.len() as u128).pow(DEFAULT_LENGTH as u32);
        Self {
            alphabet,
            length: DEFAULT_LENGTH,
            bias,
        }
    }
}
