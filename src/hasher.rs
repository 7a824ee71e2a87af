//! Fuzzy-hash representation and the adapter contract.
//!
//! The scorer never hashes text itself; it consumes hashes through the
//! [`FuzzyHasher`] trait. An adapter declares its digest width `H` up front
//! and maps each text to a fixed-width bit vector. Bitwise difference between
//! two hashes is the Hamming distance over the declared width, so for any
//! adapter it is symmetric, bounded by `H`, and zero for equal hashes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque fixed-width fuzzy hash of one text.
///
/// Stored as little-endian 64-bit words; bits at positions `>= width` are
/// kept zero so the Hamming distance never exceeds the declared width.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuzzyHash {
    words: Vec<u64>,
    width: usize,
}

impl FuzzyHash {
    /// Build a hash from raw words, masking any bits beyond `width`.
    ///
    /// `words` is truncated or zero-padded to exactly `ceil(width / 64)`
    /// words, so the result is always internally consistent.
    pub fn from_words(mut words: Vec<u64>, width: usize) -> Self {
        let word_count = width.div_ceil(64);
        words.resize(word_count, 0);
        let tail_bits = width % 64;
        if tail_bits != 0 {
            if let Some(last) = words.last_mut() {
                *last &= (1u64 << tail_bits) - 1;
            }
        }
        Self { words, width }
    }

    /// Declared bit width of this hash.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Raw digest words, little-endian bit order.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Hamming distance to `other`: XOR then popcount over all words.
    ///
    /// Symmetric and zero for equal hashes; bounded by the width because
    /// out-of-width bits are masked at construction.
    pub fn bitwise_difference(&self, other: &FuzzyHash) -> u32 {
        debug_assert_eq!(self.width, other.width, "comparing hashes of different widths");
        self.words
            .iter()
            .zip(other.words.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Errors an adapter may report while hashing a text.
///
/// The scorer never substitutes a default hash on failure; a hashing error
/// aborts the whole batch and names the offending item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HasherError {
    #[error("unsupported input: {reason}")]
    Unsupported { reason: String },
}

/// Adapter contract: text in, fixed-width fuzzy hash out.
///
/// Implementations must be deterministic — the same text always yields the
/// same hash — and every returned hash must carry exactly [`width`] bits.
/// The scorer enforces the width invariant and rejects mismatching hashes.
///
/// [`width`]: FuzzyHasher::width
pub trait FuzzyHasher {
    /// Digest width `H` in bits. All difference scores range over `[0, H]`.
    fn width(&self) -> usize;

    /// Hash one text.
    fn hash(&self, text: &str) -> Result<FuzzyHash, HasherError>;
}
