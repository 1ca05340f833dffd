//! Maps raw symbol values to dense indices and back, and derives a
//! distribution from observed frequencies.
//!
//! These are the collaborators consumed by the coder: invoked once before
//! encoding (raw values to indices) and once after decoding (indices back
//! to raw values). The coder itself only ever sees dense indices.

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::cdf::Distribution;
use crate::CodecError;

/// A finite alphabet of distinct raw symbol values, held in ascending order
/// so the dense index of a value is its rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet<T> {
    symbols: Vec<T>,
}

impl<T: Ord + Copy + Debug> Alphabet<T> {
    /// Build the alphabet of distinct values observed in `data`, together
    /// with their relative-frequency distribution (positionally aligned).
    ///
    /// Every observed symbol gets a strictly positive probability, which is
    /// the precondition the encoder relies on.
    ///
    /// # Errors
    /// Empty input yields an empty alphabet, whose distribution cannot sum
    /// to one; callers handle length-zero sequences before histogramming.
    pub fn from_observed(data: &[T]) -> Result<(Self, Distribution), CodecError> {
        let mut counts: BTreeMap<T, usize> = BTreeMap::new();
        for &value in data {
            *counts.entry(value).or_insert(0) += 1;
        }
        let total = data.len() as f64;
        let mut symbols = Vec::with_capacity(counts.len());
        let mut probabilities = Vec::with_capacity(counts.len());
        for (value, count) in counts {
            symbols.push(value);
            probabilities.push(count as f64 / total);
        }
        let distribution = Distribution::new(probabilities)?;
        Ok((Self { symbols }, distribution))
    }

    /// Rebuild an alphabet from an already-sorted list of distinct values
    /// (e.g. read back from a persisted archive).
    ///
    /// # Errors
    /// [`CodecError::ArchiveInvalid`] if the values are not strictly
    /// ascending.
    pub fn from_sorted(symbols: Vec<T>) -> Result<Self, CodecError> {
        if symbols.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CodecError::ArchiveInvalid {
                reason: "alphabet symbols are not strictly ascending".to_string(),
            });
        }
        Ok(Self { symbols })
    }

    /// The alphabet size `K`
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the alphabet is empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The raw symbol values, ascending
    pub fn symbols(&self) -> &[T] {
        &self.symbols
    }

    /// The dense index of a raw value.
    ///
    /// # Errors
    /// [`CodecError::UnknownSymbol`] if the value is not in the alphabet.
    pub fn index_of(&self, raw: &T) -> Result<usize, CodecError> {
        self.symbols
            .binary_search(raw)
            .map_err(|_| CodecError::UnknownSymbol {
                symbol: format!("{raw:?}"),
            })
    }

    /// The raw value at a dense index, if in range
    pub fn symbol_at(&self, index: usize) -> Option<&T> {
        self.symbols.get(index)
    }

    /// Map a full slice of raw values to dense indices, failing on the
    /// first unknown value (before any coding work happens).
    pub fn indices(&self, data: &[T]) -> Result<Vec<usize>, CodecError> {
        data.iter().map(|raw| self.index_of(raw)).collect()
    }

    /// Map dense indices back to raw values, failing on any out-of-range
    /// index.
    pub fn raw_values(&self, indices: &[usize]) -> Result<Vec<T>, CodecError> {
        indices
            .iter()
            .map(|&index| {
                self.symbol_at(index)
                    .copied()
                    .ok_or_else(|| CodecError::UnknownSymbol {
                        symbol: format!("index {index}"),
                    })
            })
            .collect()
    }
}
