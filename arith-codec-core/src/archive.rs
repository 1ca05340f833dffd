//! The persisted form of one compressed unit, and the byte-level
//! compress/decompress entry points built on it.
//!
//! An archive is a JSON record holding the exact textual representation of
//! the encoded value plus the metadata needed to re-derive everything else:
//! the sequence length, the alphabet of raw byte values (ascending) and the
//! positionally-aligned distribution. The precision is deliberately absent;
//! decode recomputes it from the distribution and length with the same
//! formula the encoder used.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::cdf::Distribution;
use crate::decoder::decode;
use crate::encoder::encode;
use crate::entropy::CoderParams;
use crate::fixed::Fixed;
use crate::CodecError;

/// One compressed unit, as persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    /// Exact base-10 representation of the encoded value in `[0, 1)`
    pub encoded_decimal: String,

    /// The number of symbols folded into the value
    pub length: usize,

    /// The distinct raw byte values present in the input, ascending
    pub symbols: Vec<u8>,

    /// Probability of each symbol, positionally aligned with `symbols`
    pub distribution: Vec<f64>,
}

impl Archive {
    /// Serialize the archive as JSON to a writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CodecError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Deserialize an archive from a JSON reader
    pub fn read_from<R: Read>(reader: R) -> Result<Self, CodecError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Compress a byte slice into an [`Archive`].
///
/// Histograms the bytes, maps them to dense indices, encodes, and renders
/// the value exactly as text. Empty input is legal and produces a
/// zero-length archive with an empty alphabet.
pub fn compress_bytes(data: &[u8], params: &CoderParams) -> Result<Archive, CodecError> {
    if data.is_empty() {
        return Ok(Archive {
            encoded_decimal: "0.5".to_string(),
            length: 0,
            symbols: Vec::new(),
            distribution: Vec::new(),
        });
    }

    let (alphabet, distribution) = Alphabet::from_observed(data)?;
    let sequence = alphabet.indices(data)?;
    let encoded = encode(&sequence, &distribution, params)?;

    Ok(Archive {
        encoded_decimal: encoded.value().to_decimal_string(),
        length: encoded.length(),
        symbols: alphabet.symbols().to_vec(),
        distribution: distribution.probabilities().to_vec(),
    })
}

/// Decompress an [`Archive`] back into the original bytes.
///
/// Reconstructs the distribution and length from the record, re-derives the
/// precision, replays the decode, and maps dense indices back through the
/// alphabet. Must be given the same [`CoderParams`] the compressor used.
pub fn decompress_bytes(archive: &Archive, params: &CoderParams) -> Result<Vec<u8>, CodecError> {
    if archive.length == 0 {
        return Ok(Vec::new());
    }
    if archive.symbols.len() != archive.distribution.len() {
        return Err(CodecError::ArchiveInvalid {
            reason: format!(
                "{} symbols but {} probabilities",
                archive.symbols.len(),
                archive.distribution.len()
            ),
        });
    }

    let alphabet = Alphabet::from_sorted(archive.symbols.clone())?;
    let distribution = Distribution::new(archive.distribution.clone())?;
    let precision = crate::entropy::required_precision(
        distribution.probabilities(),
        archive.length,
        params,
    );
    let value = Fixed::parse_decimal_string(&archive.encoded_decimal, precision)?;
    let sequence = decode(&value, archive.length, &distribution, params)?;
    alphabet.raw_values(&sequence)
}
