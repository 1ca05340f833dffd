//! Probability distributions and their cumulative boundary tables.

use float_cmp::approx_eq;

use crate::fixed::Fixed;
use crate::CodecError;

/// Tolerance on the distribution sum
const SUM_TOLERANCE: f64 = 1e-8;

/// A static probability distribution over a dense alphabet `0..K`.
///
/// Validated on construction and immutable afterwards, so encode and decode
/// can rebuild identical tables from the same source data.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    probabilities: Vec<f64>,
}

impl Distribution {
    /// Validate and take ownership of a probability vector.
    ///
    /// Entries must be finite and non-negative and sum to one within
    /// `1e-8`. A zero-probability entry is structurally legal (its
    /// sub-interval has zero width) but the corresponding symbol is
    /// unencodable; callers must only admit symbols with strictly positive
    /// probability.
    ///
    /// # Errors
    /// [`CodecError::DistributionInvalid`] on any violation.
    pub fn new(probabilities: Vec<f64>) -> Result<Self, CodecError> {
        for (i, &p) in probabilities.iter().enumerate() {
            if !p.is_finite() || p < 0.0 {
                return Err(CodecError::DistributionInvalid {
                    reason: format!("probability {p} at index {i} is not a finite non-negative number"),
                });
            }
        }
        let sum: f64 = probabilities.iter().sum();
        if !approx_eq!(f64, sum, 1.0, epsilon = SUM_TOLERANCE) {
            return Err(CodecError::DistributionInvalid {
                reason: format!("probabilities sum to {sum}, expected 1"),
            });
        }
        Ok(Self { probabilities })
    }

    /// The alphabet size `K`
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Whether the alphabet is empty
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// The underlying probabilities
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

/// Cumulative boundaries of a [`Distribution`] at a pass's precision.
///
/// `K + 1` fixed-point values with `boundaries[0] = 0`,
/// `boundaries[K] = 1`, non-decreasing; symbol `s` owns the half-open
/// sub-interval `[boundaries[s], boundaries[s + 1])`.
///
/// Built deterministically: the same distribution and precision always
/// produce the same table, which is what lets the decoder replay the
/// encoder's narrowing exactly.
#[derive(Debug, Clone)]
pub struct Cdf {
    boundaries: Vec<Fixed>,
}

impl Cdf {
    /// Build the boundary table for a distribution at the given precision.
    ///
    /// Each probability is converted to fixed point (truncating below
    /// `2^-precision`) and accumulated with saturation at one: a valid
    /// distribution may sum a few ulps past one in `f64`, and at a pass
    /// precision of 53 bits or more the conversion is exact, so the excess
    /// survives into the cumulative sum. The final boundary is then pinned
    /// to exactly one. Both sides build the same table from the same
    /// inputs, so replay is unaffected.
    pub fn new(distribution: &Distribution, precision: u32) -> Result<Self, CodecError> {
        let mut boundaries = Vec::with_capacity(distribution.len() + 1);
        let mut acc = Fixed::zero(precision)?;
        boundaries.push(acc.clone());
        for &p in distribution.probabilities() {
            acc = acc.saturating_add(&Fixed::from_f64(p, precision)?)?;
            boundaries.push(acc.clone());
        }
        // the zero pushed above guarantees the vec is non-empty
        let last = boundaries.len() - 1;
        boundaries[last] = Fixed::one(precision)?;
        Ok(Self { boundaries })
    }

    /// The alphabet size `K`
    pub fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Whether the alphabet is empty
    pub fn is_empty(&self) -> bool {
        self.boundaries.len() <= 1
    }

    /// The lower and upper boundaries of a symbol's sub-interval.
    ///
    /// The symbol must be a valid index, `symbol < K`; the coding passes
    /// validate every symbol before narrowing, so an out-of-range index
    /// here is a caller bug.
    pub fn bounds(&self, symbol: usize) -> (&Fixed, &Fixed) {
        debug_assert!(symbol < self.len(), "symbol {symbol} out of range");
        (&self.boundaries[symbol], &self.boundaries[symbol + 1])
    }

    /// The raw boundary values
    pub fn boundaries(&self) -> &[Fixed] {
        &self.boundaries
    }

    /// Binary-search for the symbol whose sub-interval contains `target`.
    ///
    /// Returns the unique `idx` with
    /// `boundaries[idx] <= target < boundaries[idx + 1]`. The convention is
    /// half-open: a target exactly on an inner boundary belongs to the
    /// *next* sub-interval. `None` means no sub-interval matches (target at
    /// or above one, or inside a zero-width gap the search cannot resolve) —
    /// the caller must treat that as a hard failure, never substitute an
    /// index.
    pub fn locate(&self, target: &Fixed) -> Option<usize> {
        let k = self.len();
        let mut left = 0usize;
        let mut right = k.checked_sub(1)?;
        while left <= right {
            let mid = (left + right) / 2;
            let (lower, upper) = self.bounds(mid);
            if lower <= target && target < upper {
                return Some(mid);
            } else if target < lower {
                right = mid.checked_sub(1)?;
            } else {
                left = mid + 1;
                if left > k - 1 {
                    return None;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_dist() -> Distribution {
        Distribution::new(vec![0.5, 0.25, 0.25]).unwrap()
    }

    #[test]
    fn rejects_bad_sums_and_negatives() {
        assert!(matches!(
            Distribution::new(vec![0.5, 0.4]),
            Err(CodecError::DistributionInvalid { .. })
        ));
        assert!(matches!(
            Distribution::new(vec![1.5, -0.5]),
            Err(CodecError::DistributionInvalid { .. })
        ));
        assert!(matches!(
            Distribution::new(vec![]),
            Err(CodecError::DistributionInvalid { .. })
        ));
    }

    #[test]
    fn accepts_sum_within_tolerance() {
        assert!(Distribution::new(vec![0.5, 0.5 + 1e-10]).is_ok());
    }

    #[test]
    fn boundaries_match_the_concrete_scenario() {
        // {a, b, c} with [0.5, 0.25, 0.25] => [0, 0.5, 0.75, 1]
        let cdf = Cdf::new(&quarter_dist(), 50).unwrap();
        let rendered: Vec<String> = cdf
            .boundaries()
            .iter()
            .map(Fixed::to_decimal_string)
            .collect();
        assert_eq!(rendered, ["0", "0.5", "0.75", "1"]);
    }

    #[test]
    fn boundaries_are_monotonic_and_pinned() {
        let dist = Distribution::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        let cdf = Cdf::new(&dist, 64).unwrap();
        let boundaries = cdf.boundaries();
        assert!(boundaries[0].is_zero());
        assert_eq!(*boundaries.last().unwrap(), Fixed::one(64).unwrap());
        for pair in boundaries.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn sums_a_few_ulps_above_one_are_clamped() {
        // 0.1 + 0.2 + 0.3 + 0.4 in f64 is 1.0000000000000002; at 53 bits
        // or more the per-entry conversion is exact, so the cumulative sum
        // overshoots one and must saturate rather than fail
        let dist = Distribution::new(vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        for precision in [53, 64, 200] {
            let cdf = Cdf::new(&dist, precision).unwrap();
            let one = Fixed::one(precision).unwrap();
            let boundaries = cdf.boundaries();
            assert!(boundaries[0].is_zero());
            assert_eq!(*boundaries.last().unwrap(), one);
            for pair in boundaries.windows(2) {
                assert!(pair[0] <= pair[1]);
            }
            for boundary in boundaries {
                assert!(boundary <= &one);
            }
        }
    }

    #[test]
    fn locate_uses_half_open_intervals() {
        let cdf = Cdf::new(&quarter_dist(), 50).unwrap();
        let at = |v: f64| Fixed::from_f64(v, 50).unwrap();
        assert_eq!(cdf.locate(&at(0.0)), Some(0));
        assert_eq!(cdf.locate(&at(0.49)), Some(0));
        // a target exactly on an inner boundary belongs to the next interval
        assert_eq!(cdf.locate(&at(0.5)), Some(1));
        assert_eq!(cdf.locate(&at(0.75)), Some(2));
        assert_eq!(cdf.locate(&at(0.9)), Some(2));
        assert_eq!(cdf.locate(&Fixed::one(50).unwrap()), None);
    }

    #[test]
    fn locate_skips_zero_width_intervals() {
        let dist = Distribution::new(vec![0.5, 0.0, 0.5]).unwrap();
        let cdf = Cdf::new(&dist, 50).unwrap();
        let boundary = Fixed::from_f64(0.5, 50).unwrap();
        // the zero-width interval at 0.5 can never own a target
        assert_eq!(cdf.locate(&boundary), Some(2));
    }
}
