//! Arbitrary-precision binary fractions in `[0, 1]`.
//!
//! A [`Fixed`] value is a big-integer numerator over a shared power-of-two
//! denominator: `mantissa / 2^precision`. The precision is fixed when the
//! value is constructed and every operation requires both operands to share
//! it, so one encode or decode pass works at a single, constant width.
//!
//! All operations are exact except [`Fixed::mul`] (the full double-width
//! product is truncated back to the working precision) and
//! [`Fixed::resize`]. [`Fixed::div`] is rounded so that it exactly inverts
//! the truncation of [`Fixed::mul`]; see its documentation.

use std::cmp::Ordering;
use std::fmt;

use num::{BigUint, One, ToPrimitive, Zero};
use num_traits::Float;
use thiserror::Error;

/// Error type for [`Fixed`] arithmetic
#[derive(Error, Debug, PartialEq)]
pub enum FixedError {
    /// A precision of zero digits cannot represent anything
    #[error("precision must be positive")]
    ZeroPrecision,

    /// Operands of an arithmetic operation were built at different precisions
    #[error("precision mismatch between operands ({left} vs {right})")]
    PrecisionMismatch {
        /// Precision of the left-hand operand
        left: u32,
        /// Precision of the right-hand operand
        right: u32,
    },

    /// Tried to construct a value outside of `[0, 1]`
    #[error("value {0} is outside of [0, 1]")]
    ValueOutOfRange(f64),

    /// Tried to construct a value from a NaN or infinite float
    #[error("value {0} is not finite")]
    NotFinite(f64),

    /// Subtraction would produce a negative value
    #[error("subtrahend is greater than minuend")]
    Underflow,

    /// Addition would produce a value greater than one
    #[error("sum is greater than one")]
    Overflow,

    /// Division by a zero-valued fraction
    #[error("attempted to divide by zero")]
    DivideByZero,

    /// Requested a binary digit beyond the value's precision
    #[error("digit index {index} out of range for precision {precision}")]
    DigitIndexOutOfRange {
        /// The requested digit index
        index: u32,
        /// The value's precision
        precision: u32,
    },

    /// Could not parse a decimal string representation
    #[error("could not parse \"{0}\" as a decimal in [0, 1]")]
    Parse(String),
}

/// An arbitrary-precision binary fraction in `[0, 1]`.
///
/// The represented value is `mantissa / 2^precision`, i.e. the mantissa bits
/// are the binary digits after the radix point. `1` itself is representable
/// (mantissa `2^precision`) so that an interval's upper bound can start at
/// one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
    mantissa: BigUint,
    precision: u32,
}

impl Fixed {
    /// Zero at the given precision
    pub fn zero(precision: u32) -> Result<Self, FixedError> {
        if precision == 0 {
            return Err(FixedError::ZeroPrecision);
        }
        Ok(Self {
            mantissa: BigUint::zero(),
            precision,
        })
    }

    /// One at the given precision
    pub fn one(precision: u32) -> Result<Self, FixedError> {
        if precision == 0 {
            return Err(FixedError::ZeroPrecision);
        }
        Ok(Self {
            mantissa: BigUint::one() << precision as usize,
            precision,
        })
    }

    /// Construct the closest representable value at or below the given float.
    ///
    /// The float's own 53-bit mantissa is exact, so the only loss is the
    /// truncation of anything below `2^-precision`.
    pub fn from_f64(value: f64, precision: u32) -> Result<Self, FixedError> {
        if precision == 0 {
            return Err(FixedError::ZeroPrecision);
        }
        if !value.is_finite() {
            return Err(FixedError::NotFinite(value));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(FixedError::ValueOutOfRange(value));
        }
        if value == 0.0 {
            return Self::zero(precision);
        }
        if value == 1.0 {
            return Self::one(precision);
        }

        // value = frac * 2^exponent with frac < 2^53
        let (frac, exponent, _sign) = Float::integer_decode(value);
        let shift = i64::from(precision) + i64::from(exponent);
        let mantissa = if shift >= 0 {
            BigUint::from(frac) << shift as usize
        } else {
            BigUint::from(frac) >> (-shift) as usize
        };
        Ok(Self { mantissa, precision })
    }

    /// The precision (number of binary digits) of this value
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Whether this value is exactly zero
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Exact addition.
    ///
    /// # Errors
    /// Fails on a precision mismatch, or if the sum exceeds one.
    pub fn checked_add(&self, other: &Self) -> Result<Self, FixedError> {
        self.check_precision(other)?;
        let mantissa = &self.mantissa + &other.mantissa;
        if mantissa > (BigUint::one() << self.precision as usize) {
            return Err(FixedError::Overflow);
        }
        Ok(Self {
            mantissa,
            precision: self.precision,
        })
    }

    /// Addition clamped at one.
    ///
    /// Like [`Fixed::checked_add`] but a sum past the top of the unit
    /// interval saturates to exactly one instead of failing. Used when
    /// accumulating boundaries whose float-derived addends can overshoot
    /// one by a few ulps in aggregate.
    ///
    /// # Errors
    /// Fails on a precision mismatch.
    pub fn saturating_add(&self, other: &Self) -> Result<Self, FixedError> {
        self.check_precision(other)?;
        let one = BigUint::one() << self.precision as usize;
        let sum = &self.mantissa + &other.mantissa;
        Ok(Self {
            mantissa: sum.min(one),
            precision: self.precision,
        })
    }

    /// Exact subtraction. The minuend must be at least the subtrahend; the
    /// borrow propagation across digits is handled by the big-integer
    /// subtraction itself.
    ///
    /// # Errors
    /// Fails on a precision mismatch, or if the subtrahend is larger.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, FixedError> {
        self.check_precision(other)?;
        if other.mantissa > self.mantissa {
            return Err(FixedError::Underflow);
        }
        Ok(Self {
            mantissa: &self.mantissa - &other.mantissa,
            precision: self.precision,
        })
    }

    /// Multiplication, truncated back to the working precision.
    ///
    /// The full `2 * precision`-bit product is computed exactly, then the low
    /// `precision` bits are discarded (round toward zero). This is the one
    /// lossy operation on the coding path; [`Fixed::div`] is rounded to
    /// invert exactly this policy.
    pub fn mul(&self, other: &Self) -> Result<Self, FixedError> {
        self.check_precision(other)?;
        Ok(Self {
            mantissa: (&self.mantissa * &other.mantissa) >> self.precision as usize,
            precision: self.precision,
        })
    }

    /// Division, rounded as the inverse of [`Fixed::mul`]'s truncation.
    ///
    /// Returns the largest representable `q` such that
    /// `q.mul(divisor) <= self`. With this policy, a decoder that divides an
    /// offset by the interval range lands in exactly the sub-interval whose
    /// truncated-multiply boundaries bracket the offset, so encode and
    /// decode can never disagree about a boundary.
    pub fn div(&self, divisor: &Self) -> Result<Self, FixedError> {
        self.check_precision(divisor)?;
        if divisor.mantissa.is_zero() {
            return Err(FixedError::DivideByZero);
        }
        // largest q with (q * divisor) >> P <= self, i.e.
        // q = floor(((self + 1) << P - 1) / divisor)
        let numerator =
            ((&self.mantissa + BigUint::one()) << self.precision as usize) - BigUint::one();
        Ok(Self {
            mantissa: numerator / &divisor.mantissa,
            precision: self.precision,
        })
    }

    /// The midpoint between this value and a greater-or-equal one, truncating
    /// the final halving bit.
    pub fn midpoint(&self, other: &Self) -> Result<Self, FixedError> {
        self.check_precision(other)?;
        if other.mantissa < self.mantissa {
            return Err(FixedError::Underflow);
        }
        let half_width = (&other.mantissa - &self.mantissa) >> 1usize;
        Ok(Self {
            mantissa: &self.mantissa + half_width,
            precision: self.precision,
        })
    }

    /// Change the precision of a value.
    ///
    /// This is an explicit resize boundary: extending is exact, shrinking
    /// truncates the dropped low digits. It must never be applied in the
    /// middle of a pass; values are resized only at entry points, before any
    /// interval arithmetic has been done at the new width.
    pub fn resize(&self, precision: u32) -> Result<Self, FixedError> {
        if precision == 0 {
            return Err(FixedError::ZeroPrecision);
        }
        let mantissa = if precision >= self.precision {
            &self.mantissa << (precision - self.precision) as usize
        } else {
            &self.mantissa >> (self.precision - precision) as usize
        };
        Ok(Self { mantissa, precision })
    }

    /// The binary digit at the given index (0 is the digit just after the
    /// radix point).
    pub fn digit(&self, index: u32) -> Result<bool, FixedError> {
        if index >= self.precision {
            return Err(FixedError::DigitIndexOutOfRange {
                index,
                precision: self.precision,
            });
        }
        Ok(self.mantissa.bit(u64::from(self.precision - 1 - index)))
    }

    /// An `f64` approximation of this value, for reporting only
    pub fn to_f64(&self) -> f64 {
        if self.precision <= 64 {
            let m = self.mantissa.to_u64().unwrap_or(u64::MAX) as f64;
            m / (2f64).powi(self.precision as i32)
        } else {
            let shifted = &self.mantissa >> (self.precision - 64) as usize;
            let m = shifted.to_u64().unwrap_or(u64::MAX) as f64;
            m / (2f64).powi(64)
        }
    }

    /// Exact base-10 representation, e.g. `"0.306640625"`.
    ///
    /// `mantissa / 2^P` always terminates in at most `P` decimal digits
    /// (`mantissa * 5^P / 10^P`), so nothing is lost. Trailing zeros are
    /// trimmed; [`Fixed::parse_decimal_string`] recovers the mantissa
    /// exactly.
    pub fn to_decimal_string(&self) -> String {
        if self.mantissa.is_zero() {
            return "0".to_string();
        }
        if self.mantissa == BigUint::one() << self.precision as usize {
            return "1".to_string();
        }
        let scaled = &self.mantissa * BigUint::from(5u8).pow(self.precision);
        let digits = scaled.to_str_radix(10);
        let padded = format!("{digits:0>width$}", width = self.precision as usize);
        format!("0.{}", padded.trim_end_matches('0'))
    }

    /// Parse a base-10 representation produced by
    /// [`Fixed::to_decimal_string`] at the given precision.
    ///
    /// Exact for strings this type produced itself (at the same precision);
    /// anything else is truncated below `2^-precision`.
    pub fn parse_decimal_string(text: &str, precision: u32) -> Result<Self, FixedError> {
        if precision == 0 {
            return Err(FixedError::ZeroPrecision);
        }
        let parse_err = || FixedError::Parse(text.to_string());

        let trimmed = text.trim();
        let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_err());
        }
        match int_part {
            "0" => {}
            "1" => {
                return if frac_part.bytes().all(|b| b == b'0') {
                    Self::one(precision)
                } else {
                    Err(parse_err())
                };
            }
            _ => return Err(parse_err()),
        }
        if frac_part.is_empty() {
            return Self::zero(precision);
        }

        let digits = BigUint::parse_bytes(frac_part.as_bytes(), 10).ok_or_else(parse_err)?;
        let denominator = BigUint::from(10u8).pow(frac_part.len() as u32);
        let mantissa = (digits << precision as usize) / denominator;
        Ok(Self { mantissa, precision })
    }

    fn check_precision(&self, other: &Self) -> Result<(), FixedError> {
        if self.precision == other.precision {
            Ok(())
        } else {
            Err(FixedError::PrecisionMismatch {
                left: self.precision,
                right: other.precision,
            })
        }
    }
}

/// Lexicographic digit order. Values of different precisions are not
/// comparable; every coding pass keeps all its operands at one precision.
impl PartialOrd for Fixed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.precision == other.precision).then(|| self.mantissa.cmp(&other.mantissa))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}
