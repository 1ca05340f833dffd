//! Replays the interval narrowing in reverse to recover the symbol
//! sequence from an encoded value.

use crate::cdf::{Cdf, Distribution};
use crate::entropy::{required_precision, CoderParams};
use crate::fixed::Fixed;
use crate::CodecError;

/// Decode `n` symbols from an encoded value against a static distribution.
///
/// The precision is re-derived with the same formula the encoder used, and
/// the CDF rebuilt identically, so the narrowing replays the encoder's
/// arithmetic step for step. Each step divides the value's offset into the
/// current interval by the interval's range (with the rounding policy that
/// inverts the encoder's truncating multiply) and binary-searches the CDF
/// for the sub-interval owning that target.
///
/// `n == 0` returns an empty sequence without consulting the CDF.
///
/// # Errors
///
/// - [`CodecError::DecodeDesync`]: the value fell outside the current
///   interval or no sub-interval matched the target. The decode is aborted;
///   continuing would silently fabricate data.
/// - [`CodecError::PrecisionExhausted`]: the replayed interval collapsed,
///   mirroring the failure the encoder would have reported.
pub fn decode(
    value: &Fixed,
    n: usize,
    distribution: &Distribution,
    params: &CoderParams,
) -> Result<Vec<usize>, CodecError> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let precision = required_precision(distribution.probabilities(), n, params);
    // resizing is a no-op when the value came from our own encoder, since
    // both sides derive the same precision; foreign values are brought to
    // the pass width here, before any interval arithmetic
    let value = if value.precision() == precision {
        value.clone()
    } else {
        value.resize(precision)?
    };

    let cdf = Cdf::new(distribution, precision)?;
    let mut low = Fixed::zero(precision)?;
    let mut high = Fixed::one(precision)?;
    let mut sequence = Vec::with_capacity(n);

    for step in 0..n {
        if value < low || value >= high {
            return Err(CodecError::DecodeDesync { step });
        }
        let range = high.checked_sub(&low)?;
        let target = value.checked_sub(&low)?.div(&range)?;
        let symbol = cdf
            .locate(&target)
            .ok_or(CodecError::DecodeDesync { step })?;

        let (sym_low, sym_high) = cdf.bounds(symbol);
        high = low.checked_add(&range.mul(sym_high)?)?;
        low = low.checked_add(&range.mul(sym_low)?)?;
        if low >= high {
            return Err(CodecError::PrecisionExhausted { step });
        }
        sequence.push(symbol);
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    fn abc_distribution() -> Distribution {
        Distribution::new(vec![0.5, 0.25, 0.25]).unwrap()
    }

    #[test]
    fn recovers_the_reference_sequence() {
        let params = CoderParams::default();
        let dist = abc_distribution();
        let sequence = vec![0, 1, 0, 2];
        let encoded = encode(&sequence, &dist, &params).unwrap();
        let decoded = decode(encoded.value(), 4, &dist, &params).unwrap();
        assert_eq!(decoded, sequence);
    }

    #[test]
    fn zero_length_ignores_the_value() {
        let params = CoderParams::default();
        let garbage = Fixed::from_f64(0.9, 50).unwrap();
        let decoded = decode(&garbage, 0, &abc_distribution(), &params).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn value_at_one_desyncs_instead_of_guessing() {
        let params = CoderParams::default();
        let one = Fixed::one(50).unwrap();
        let err = decode(&one, 4, &abc_distribution(), &params).unwrap_err();
        assert!(matches!(err, CodecError::DecodeDesync { step: 0 }));
    }

    #[test]
    fn wrong_distribution_still_yields_a_sequence_not_a_crash() {
        // decoding against a different (valid) distribution is undetectable
        // in general; it must either produce some sequence or desync, never
        // panic
        let params = CoderParams::default();
        let encoded = encode(&[0, 1, 0, 2], &abc_distribution(), &params).unwrap();
        let other = Distribution::new(vec![0.25, 0.25, 0.5]).unwrap();
        let result = decode(encoded.value(), 4, &other, &params);
        if let Ok(sequence) = result {
            assert_eq!(sequence.len(), 4);
        }
    }
}
