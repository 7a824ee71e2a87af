//! # dupeprob
//!
//! Batch near-duplicate likelihood scoring over fuzzy hashes.
//!
//! Given a batch of free-form texts — typically suspected spam — this crate
//! estimates, for each text, the probability that it belongs to a dominant
//! cluster of mutually similar texts. There is no training data and no
//! statistical calibration: the "probability" is the fraction of the batch
//! an item closely resembles, a heuristic ranking signal for how templated
//! each text is relative to the rest.
//!
//! ## Contract
//!
//! - The scorer consumes fuzzy hashes through the [`FuzzyHasher`] trait and
//!   performs no hashing logic itself; the built-in [`NilsimsaHasher`]
//!   (256-bit) is provided as a default adapter.
//! - The pipeline is a pure function of `(texts, hasher, config)` with no
//!   I/O, no clocks, and no global state.
//! - The output probability vector has the same length and order as the
//!   input, every value in `[0, 1]`.
//!
//! Invariant: for the same texts, the same adapter, and the same
//! [`ScorerConfig`], repeated runs produce bit-identical probability
//! vectors, regardless of the `use_parallel` flag.
//!
//! ## Pipeline
//!
//! 1. **Hashing**: each text becomes a fixed-width fuzzy hash. Any adapter
//!    failure aborts the whole batch naming the offending item.
//! 2. **Matrix construction**: every pair `(i, j)` with `i > j` gets a
//!    similarity score `H - bitwise_difference`, stored in a flat
//!    lower-triangular buffer (`O(n²/2)` cells, never a full square).
//! 3. **Rebasing**: all scores shift down by the batch minimum, so the
//!    cutoff is measured against the batch's own spread rather than the
//!    hash algorithm's theoretical range.
//! 4. **Estimation**: each item's row and column of rebased scores collapse
//!    into one probability — canonically the fraction of other items above
//!    the high-similarity cutoff.
//!
//! Cost is quadratic in batch size; the caller is responsible for batch
//! sizing. Empty and singleton batches are valid and produce `[]` / `[0.0]`.
//!
//! ## Example
//!
//! ```
//! use dupeprob::{score_texts, NilsimsaHasher, ScorerConfig};
//!
//! let texts = [
//!     "Dear friend, you have won a huge prize, claim it now!",
//!     "Dear friend, you have won a huge prize, claim it today!",
//!     "meeting notes: revisit the quarterly roadmap on tuesday",
//! ];
//! let probs = score_texts(&texts, &NilsimsaHasher::new(), &ScorerConfig::default())?;
//!
//! assert_eq!(probs.len(), texts.len());
//! assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
//! # Ok::<(), dupeprob::ScoreError>(())
//! ```

pub mod batch;
pub mod config;
pub mod hasher;
pub mod matrix;
pub mod nilsimsa;

pub use crate::batch::{Batch, BatchReport};
pub use crate::config::{EstimatorKind, ScoreError, ScorerConfig};
pub use crate::hasher::{FuzzyHash, FuzzyHasher, HasherError};
pub use crate::matrix::TriMatrix;
pub use crate::nilsimsa::{NilsimsaHasher, NILSIMSA_WIDTH};

/// Current scorer algorithm version for this crate.
pub const SCORER_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const SCORER_ALGORITHM: &str = "rebase+thresholdcount_v1";

/// Score a batch of texts in one call.
///
/// Convenience wrapper over [`Batch::compute`] for callers that only need
/// the probability vector.
pub fn score_texts<S, H>(
    texts: &[S],
    hasher: &H,
    cfg: &ScorerConfig,
) -> Result<Vec<f64>, ScoreError>
where
    S: AsRef<str>,
    H: FuzzyHasher + ?Sized,
{
    Ok(Batch::compute(texts, hasher, cfg)?.probabilities().to_vec())
}
