//! Batch façade: hash, score, rebase, estimate.
//!
//! A [`Batch`] is built once from an ordered text list and never mutated;
//! every derived artifact (hashes, score triangle, probability vector) is
//! read-only afterwards. The probability vector has the same length and
//! order as the input.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{EstimatorKind, ScoreError, ScorerConfig};
use crate::hasher::{FuzzyHash, FuzzyHasher};
use crate::matrix::{build_scores, TriMatrix};

/// One computed batch: the unit of near-duplicate scoring.
///
/// Holds the derived hashes, the rebased score triangle, the batch-relative
/// score ceiling, and the order-aligned probability vector.
#[derive(Debug, Clone)]
pub struct Batch {
    hashes: Vec<FuzzyHash>,
    scores: TriMatrix,
    global_min: u32,
    max_possible: u32,
    probabilities: Vec<f64>,
}

impl Batch {
    /// Run the full pipeline over `texts`.
    ///
    /// Fails on an invalid config, on any hashing error (naming the item),
    /// or on an adapter returning a hash of the wrong width. Empty and
    /// singleton batches are valid degenerate inputs, not errors.
    pub fn compute<S, H>(texts: &[S], hasher: &H, cfg: &ScorerConfig) -> Result<Self, ScoreError>
    where
        S: AsRef<str>,
        H: FuzzyHasher + ?Sized,
    {
        cfg.validate()?;

        let width = hasher.width();
        if width == 0 {
            return Err(ScoreError::ZeroHashWidth);
        }

        // --- Hashing stage ---
        // A failure aborts the batch: substituting a default hash or skipping
        // the item would silently alter every other item's result.
        let mut hashes = Vec::with_capacity(texts.len());
        for (index, text) in texts.iter().enumerate() {
            let hash = hasher
                .hash(text.as_ref())
                .map_err(|source| ScoreError::Hash { index, source })?;
            if hash.width() != width {
                return Err(ScoreError::WidthMismatch {
                    index,
                    expected: width,
                    got: hash.width(),
                });
            }
            hashes.push(hash);
        }
        debug!(n = hashes.len(), width, "hashed batch");

        // --- Matrix construction + rebasing ---
        let mut scores = build_scores(&hashes, width, cfg.use_parallel);
        let global_min = scores.rebase();
        let max_possible = width as u32 - global_min;
        debug!(
            pairs = scores.pair_count(),
            global_min, max_possible, "built and rebased score triangle"
        );

        // --- Estimation ---
        let probabilities = estimate(&scores, width, max_possible, cfg);

        Ok(Self {
            hashes,
            scores,
            global_min,
            max_possible,
            probabilities,
        })
    }

    /// Number of items in the batch.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// True for the zero-item batch.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Order-aligned clustering probabilities, each in `[0, 1]`.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of the item at `index`, if it exists.
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    /// Derived fuzzy hashes, order-aligned with the input texts.
    pub fn hashes(&self) -> &[FuzzyHash] {
        &self.hashes
    }

    /// Rebased score of the pair `(i, j)`, or `None` unless `j < i < len`.
    ///
    /// Only the strict lower triangle exists; ask for `(i, j)` with `i > j`.
    pub fn score(&self, i: usize, j: usize) -> Option<u32> {
        (j < i && i < self.len()).then(|| self.scores.get(i, j))
    }

    /// Minimum raw score observed across the batch (the rebasing offset).
    pub fn global_min(&self) -> u32 {
        self.global_min
    }

    /// Batch-relative score ceiling: `H - global_min`.
    ///
    /// Zero means no pair can clear the similarity cutoff and every
    /// probability degenerates to `0.0`.
    pub fn max_possible(&self) -> u32 {
        self.max_possible
    }

    /// Summary of the batch suitable for serialization.
    pub fn report(&self) -> BatchReport {
        BatchReport {
            items: self.len(),
            global_min: self.global_min,
            max_possible: self.max_possible,
            probabilities: self.probabilities.clone(),
        }
    }
}

/// Serializable summary of a computed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub items: usize,
    pub global_min: u32,
    pub max_possible: u32,
    pub probabilities: Vec<f64>,
}

/// Turn the rebased triangle into the order-aligned probability vector.
fn estimate(scores: &TriMatrix, width: usize, max_possible: u32, cfg: &ScorerConfig) -> Vec<f64> {
    let n = scores.items();
    match n {
        0 => return Vec::new(),
        // No other item to compare against; never divide by zero.
        1 => return vec![0.0],
        _ => {}
    }

    let item_probability = |i: usize| -> f64 {
        match cfg.estimator {
            EstimatorKind::ThresholdCount => {
                threshold_count(scores, i, max_possible, cfg.threshold_fraction)
            }
            EstimatorKind::MeanScore => mean_score(scores, i, width),
        }
    };

    if cfg.use_parallel {
        (0..n).into_par_iter().map(item_probability).collect()
    } else {
        (0..n).map(item_probability).collect()
    }
}

/// Canonical estimator: the fraction of other items whose rebased score with
/// `i` strictly exceeds `threshold_fraction * max_possible`.
///
/// Only the lower triangle is stored, so item `i` owns row entries for
/// `j < i` and column entries `(k, i)` for `k > i`. The strict comparison
/// makes the degenerate `max_possible = 0` batch score all-zero.
fn threshold_count(scores: &TriMatrix, i: usize, max_possible: u32, fraction: f64) -> f64 {
    let n = scores.items();
    let cutoff = fraction * f64::from(max_possible);
    let mut count = 0usize;
    for j in 0..i {
        if f64::from(scores.get(i, j)) > cutoff {
            count += 1;
        }
    }
    for k in (i + 1)..n {
        if f64::from(scores.get(k, i)) > cutoff {
            count += 1;
        }
    }
    count as f64 / (n - 1) as f64
}

/// Historical estimator: mean rebased score over the other `n - 1` items,
/// taken as a fraction of the hash width `H`.
///
/// The divisor is deliberately the absolute width, not `max_possible`: the
/// historical form averaged scores against the hash algorithm's full range.
fn mean_score(scores: &TriMatrix, i: usize, width: usize) -> f64 {
    let n = scores.items();
    let mut sum = 0u64;
    for j in 0..i {
        sum += u64::from(scores.get(i, j));
    }
    for k in (i + 1)..n {
        sum += u64::from(scores.get(k, i));
    }
    sum as f64 / (n - 1) as f64 / width as f64
}
