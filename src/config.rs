//! Configuration and error types for batch near-duplicate scoring.
//!
//! This module defines the public configuration surface for the scorer. It
//! is intentionally free of any I/O or environment-dependent behavior so the
//! whole pipeline stays a pure function of `(texts, hasher, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hasher::HasherError;

/// Which probability formula the estimator applies to an item's scores.
///
/// The two forms reflect an evolution of the design, not two coexisting
/// features; a batch is always scored with exactly one of them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    /// Count the items whose rebased score strictly exceeds
    /// `threshold_fraction * max_possible`, then divide by `n - 1`.
    ///
    /// This is the canonical form: a tight cluster of `k` near-identical
    /// items yields probabilities near `(k - 1) / (n - 1)` while isolated
    /// items stay near zero.
    #[default]
    ThresholdCount,
    /// Average the item's rebased scores over `n - 1` and divide by the
    /// hash width `H`. Kept as the documented historical alternative; it
    /// dilutes a dominant cluster with low-similarity background pairs.
    MeanScore,
}

/// Semantic configuration for the batch scorer.
///
/// The scorer only works over fuzzy hashes produced by a
/// [`FuzzyHasher`](crate::hasher::FuzzyHasher); the hash bit width is
/// declared by the adapter, never by this config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorerConfig {
    /// Configuration schema version.
    ///
    /// Any change that can affect the probability vector must bump this
    /// version so old results remain replayable and comparable.
    pub version: u32,
    /// High-similarity cutoff as a fraction of the batch-relative maximum
    /// score, in `(0, 1]`.
    ///
    /// A pair counts as close when its rebased score strictly exceeds
    /// `threshold_fraction * max_possible`. Because the comparison is
    /// strict, `1.0` is a valid but degenerate setting: no pair, not even
    /// an exact duplicate, can clear the cutoff, and every probability is
    /// `0.0`.
    pub threshold_fraction: f64,
    /// Probability formula; see [`EstimatorKind`].
    pub estimator: EstimatorKind,
    /// Enable parallel matrix construction and per-item estimation.
    ///
    /// The parallel path produces bit-identical output to the sequential
    /// one; this flag only trades CPU for wall-clock time.
    pub use_parallel: bool,
}

impl ScorerConfig {
    /// Create a new configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the high-similarity cutoff fraction. Typical values: 0.7-0.9.
    /// Higher values demand tighter clusters before an item scores; at
    /// exactly `1.0` nothing clears the strict cutoff and all items score
    /// `0.0`.
    pub fn with_threshold_fraction(mut self, threshold_fraction: f64) -> Self {
        self.threshold_fraction = threshold_fraction;
        self
    }

    /// Select the probability formula.
    pub fn with_estimator(mut self, estimator: EstimatorKind) -> Self {
        self.estimator = estimator;
        self
    }

    /// Enable or disable parallel computation.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.version < 1 {
            return Err(ScoreError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if !self.threshold_fraction.is_finite()
            || self.threshold_fraction <= 0.0
            || self.threshold_fraction > 1.0
        {
            return Err(ScoreError::InvalidConfigThreshold {
                threshold_fraction: self.threshold_fraction,
            });
        }
        Ok(())
    }
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            threshold_fraction: 0.8,
            estimator: EstimatorKind::ThresholdCount,
            use_parallel: false,
        }
    }
}

/// Errors returned by the batch scoring pipeline.
///
/// Failures abort the whole batch: skipping one item would change the
/// denominator for every other item, silently corrupting the result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoreError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("invalid config: threshold_fraction must be in (0, 1] (got {threshold_fraction})")]
    InvalidConfigThreshold { threshold_fraction: f64 },

    #[error("hasher declares a zero bit width")]
    ZeroHashWidth,

    #[error("hashing item {index} failed: {source}")]
    Hash {
        index: usize,
        #[source]
        source: HasherError,
    },

    #[error("hash for item {index} is {got} bits wide; hasher declares {expected}")]
    WidthMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },
}
