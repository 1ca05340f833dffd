//! Folds a symbol sequence into one shrinking interval and emits its
//! representative value.

use crate::cdf::{Cdf, Distribution};
use crate::entropy::{required_precision, CoderParams};
use crate::fixed::Fixed;
use crate::CodecError;

/// The result of encoding one sequence: a single value in `[0, 1)` that
/// uniquely identifies it, given the same distribution and length.
///
/// The precision is carried for inspection only; the decoder re-derives it
/// from the distribution and length rather than trusting a stored one.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    value: Fixed,
    length: usize,
    precision: u32,
}

impl Encoded {
    /// The encoded value, the midpoint of the final interval
    pub fn value(&self) -> &Fixed {
        &self.value
    }

    /// The number of symbols folded into the value
    pub fn length(&self) -> usize {
        self.length
    }

    /// The precision the pass ran at
    pub fn precision(&self) -> u32 {
        self.precision
    }
}

/// Encode a sequence of symbol indices against a static distribution.
///
/// Starting from `[0, 1)`, each symbol narrows the interval to its
/// sub-interval of the current range. The returned value is the midpoint of
/// the final interval, maximising distance from both boundaries so that
/// representation rounding on either side cannot push it out.
///
/// An empty sequence encodes to the midpoint of `[0, 1)` without consulting
/// the CDF.
///
/// # Errors
///
/// - [`CodecError::UnknownSymbol`]: a symbol index is outside the alphabet.
///   Checked up front, before any narrowing.
/// - [`CodecError::PrecisionExhausted`]: the interval collapsed before all
///   symbols were consumed. The pass is aborted; re-running with the same
///   inputs is deterministic, so recovery requires a larger
///   [`CoderParams::safety_factor`] or [`CoderParams::min_precision`].
pub fn encode(
    sequence: &[usize],
    distribution: &Distribution,
    params: &CoderParams,
) -> Result<Encoded, CodecError> {
    let k = distribution.len();
    for &symbol in sequence {
        if symbol >= k {
            return Err(CodecError::UnknownSymbol {
                symbol: symbol.to_string(),
            });
        }
    }

    let precision = required_precision(distribution.probabilities(), sequence.len(), params);
    if sequence.is_empty() {
        let value = Fixed::zero(precision)?.midpoint(&Fixed::one(precision)?)?;
        return Ok(Encoded {
            value,
            length: 0,
            precision,
        });
    }

    let cdf = Cdf::new(distribution, precision)?;
    let mut low = Fixed::zero(precision)?;
    let mut high = Fixed::one(precision)?;

    for (step, &symbol) in sequence.iter().enumerate() {
        let range = high.checked_sub(&low)?;
        let (sym_low, sym_high) = cdf.bounds(symbol);
        high = low.checked_add(&range.mul(sym_high)?)?;
        low = low.checked_add(&range.mul(sym_low)?)?;
        if low >= high {
            return Err(CodecError::PrecisionExhausted { step });
        }
    }

    let value = low.midpoint(&high)?;
    Ok(Encoded {
        value,
        length: sequence.len(),
        precision,
    })
}
