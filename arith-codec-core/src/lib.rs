//! Static arithmetic coding of symbol sequences into a single
//! arbitrary-precision decimal value.
//!
//! Given a finite alphabet with a known, fixed probability distribution,
//! the encoder folds a whole symbol sequence into one shrinking interval
//! `[low, high)` and emits a single fractional value identifying it; the
//! decoder replays the narrowing against the same distribution to recover
//! the sequence exactly. The distribution is static (fixed before coding
//! begins), the output is a numeric value plus metadata rather than a
//! byte-aligned bitstream, and the design optimises for correctness and
//! precision-sufficiency over throughput: per-step cost grows with the
//! working precision, which itself grows with sequence length.
//!
//! The pieces, leaves first:
//! - [`Fixed`]: the arbitrary-precision fixed-point substrate.
//! - [`required_precision`]: sizes the working precision from the
//!   distribution's entropy and the sequence length.
//! - [`Cdf`]: cumulative sub-interval boundaries of a [`Distribution`].
//! - [`encode`] / [`decode`]: the interval-narrowing passes.
//! - [`Alphabet`]: raw symbol values to dense indices and back.
//! - [`Archive`]: the persisted record, with [`compress_bytes`] /
//!   [`decompress_bytes`] tying everything together.

#![warn(missing_docs)]

use thiserror::Error;

pub mod alphabet;
pub mod archive;
pub mod cdf;
pub mod decoder;
pub mod encoder;
pub mod entropy;
pub mod fixed;

pub use alphabet::Alphabet;
pub use archive::{compress_bytes, decompress_bytes, Archive};
pub use cdf::{Cdf, Distribution};
pub use decoder::decode;
pub use encoder::{encode, Encoded};
pub use entropy::{required_precision, shannon_entropy, CoderParams};
pub use fixed::{Fixed, FixedError};

/// Error type for encoding and decoding operations.
///
/// None of these are retried internally, and no failure leaves partial
/// output behind; all propagate to the caller as distinct conditions.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The probabilities are negative, non-finite, or do not sum to one
    /// within tolerance. Detected eagerly, before any coding begins.
    #[error("invalid distribution: {reason}")]
    DistributionInvalid {
        /// What the validation found
        reason: String,
    },

    /// The interval collapsed (`low >= high`) before all symbols were
    /// consumed. The pass is deterministic, so retrying with identical
    /// inputs cannot help; only a larger safety factor or precision floor
    /// can.
    #[error("interval collapsed at step {step}; precision exhausted")]
    PrecisionExhausted {
        /// The narrowing step at which the interval collapsed
        step: usize,
    },

    /// No CDF sub-interval matched the decoder's computed target.
    /// Continuing would silently fabricate data, so the decode aborts.
    #[error("decode desynchronised at step {step}: no matching CDF interval")]
    DecodeDesync {
        /// The decode step at which no boundary matched
        step: usize,
    },

    /// A symbol outside the alphabet was submitted for encoding. Surfaced
    /// before any interval narrowing occurs.
    #[error("symbol {symbol} is not in the alphabet")]
    UnknownSymbol {
        /// A rendering of the offending symbol
        symbol: String,
    },

    /// A persisted archive is internally inconsistent
    #[error("invalid archive: {reason}")]
    ArchiveInvalid {
        /// What the validation found
        reason: String,
    },

    /// An error in the fixed-point substrate (precision mismatch,
    /// overflow, unparsable value text, ...)
    #[error(transparent)]
    Fixed(#[from] FixedError),

    /// An I/O error while reading or writing an archive
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A serialization error while reading or writing an archive
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
