//! Entropy-based sizing of the working precision.
//!
//! After `N` narrowing steps the interval width is on the order of
//! `2^-(N * H)` bits, where `H` is the Shannon entropy of the distribution.
//! Under-provisioned precision makes the interval collapse (`low == high`)
//! before all symbols are folded in, which destroys information
//! irrecoverably, so the estimate carries a safety margin and a floor.
//!
//! The decoder never receives the precision: it re-derives it from the same
//! distribution and length with the same formula, so both sides replay an
//! identical precision schedule.

/// Parameters governing a single encode or decode pass.
///
/// Always passed explicitly into each call, never ambient state, so
/// concurrent independent passes cannot interfere with each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoderParams {
    /// Multiplier on the entropy estimate, compensating for estimation
    /// slack. Must be greater than one. This is a tunable margin validated
    /// empirically by the round-trip tests, not a proven bound.
    pub safety_factor: f64,

    /// Lower bound on the precision, flooring short or degenerate inputs
    pub min_precision: u32,

    /// Hard upper bound on the precision. Capping below the estimate forces
    /// a `PrecisionExhausted` failure rather than a wrong result; useful for
    /// testing and for bounding memory on hostile inputs.
    pub precision_cap: Option<u32>,
}

impl Default for CoderParams {
    fn default() -> Self {
        Self {
            safety_factor: 1.2,
            min_precision: 50,
            precision_cap: None,
        }
    }
}

/// Shannon entropy of a distribution, in bits (base 2, the base of the
/// fixed-point arithmetic). Zero-probability entries contribute nothing.
pub fn shannon_entropy(distribution: &[f64]) -> f64 {
    distribution
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

/// The number of binary digits needed to encode `n` symbols drawn from
/// `distribution`: `max(min_precision, ceil(H * n * safety_factor))`,
/// clamped by the optional cap.
pub fn required_precision(distribution: &[f64], n: usize, params: &CoderParams) -> u32 {
    let estimate = (shannon_entropy(distribution) * n as f64 * params.safety_factor).ceil();
    let precision = if estimate >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        (estimate as u32).max(params.min_precision)
    };
    match params.precision_cap {
        Some(cap) => precision.min(cap),
        None => precision,
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn entropy_of_uniform_pair_is_one_bit() {
        assert!(approx_eq!(f64, shannon_entropy(&[0.5, 0.5]), 1.0));
    }

    #[test]
    fn entropy_ignores_zero_probabilities() {
        assert!(approx_eq!(
            f64,
            shannon_entropy(&[0.5, 0.5, 0.0]),
            1.0
        ));
    }

    #[test]
    fn skewed_needs_less_precision_than_uniform() {
        let params = CoderParams::default();
        let skewed = required_precision(&[0.99, 0.01], 1000, &params);
        let uniform = required_precision(&[0.5, 0.5], 1000, &params);
        assert!(skewed < uniform);
        assert_eq!(uniform, 1200);
    }

    #[test]
    fn short_inputs_hit_the_floor() {
        let params = CoderParams::default();
        assert_eq!(required_precision(&[0.5, 0.5], 4, &params), 50);
        assert_eq!(required_precision(&[1.0], 0, &params), 50);
    }

    #[test]
    fn cap_overrides_the_estimate() {
        let params = CoderParams {
            precision_cap: Some(20),
            ..Default::default()
        };
        assert_eq!(required_precision(&[0.5, 0.5], 1000, &params), 20);
    }
}
