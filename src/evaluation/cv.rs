//! Cross-validation for hyperparameter selection.
//!
//! ## Purpose
//!
//! This module provides cross-validation tools for selecting a
//! hyperparameter (the ridge penalty `alpha`) among candidates. It
//! implements k-fold and leave-one-out strategies over sample indices.
//!
//! ## Design notes
//!
//! * **Generic Strategy**: Supports both k-fold and leave-one-out (LOOCV).
//! * **Callback**: Model fitting and error computation are delegated to a closure.
//! * **Optimization**: Selects the candidate that minimizes mean held-out error.
//! * **Folds**: The first `n % k` folds hold one extra sample.
//!
//! ## Key concepts
//!
//! * **K-Fold**: Partitions samples into k subsamples (train on k-1, test on 1).
//! * **LOOCV**: Extreme case where k equals sample size (n iterations).
//! * **Shuffling**: Optional seeded shuffle of sample order before folding.
//!
//! ## Invariants
//!
//! * Training and test sets are disjoint in each fold.
//! * Every sample is in exactly one test set.
//! * Ties are resolved in favor of the earliest candidate.
//!
//! ## Non-goals
//!
//! * This module does not fit models itself (done via callback).
//! * This module does not provide stratified or grouped splitting.

use core::cmp::Ordering;
use num_traits::Float;

use crate::primitives::errors::AlignError;
use crate::primitives::rng::SimpleRng;

// ============================================================================
// Internal CV Kind (for storage)
// ============================================================================

/// Internal representation of CV method for storage (no lifetime needed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CVKind {
    /// K-fold cross-validation with k folds.
    KFold(usize),
    /// Leave-one-out cross-validation.
    #[allow(clippy::upper_case_acronyms)]
    LOOCV,
}

impl Default for CVKind {
    fn default() -> Self {
        CVKind::KFold(4)
    }
}

// ============================================================================
// Cross-Validation Configuration
// ============================================================================

/// Cross-validation configuration combining strategy, candidates, and seed.
#[derive(Debug, Clone)]
pub struct CVConfig<'a, T> {
    /// The CV strategy kind.
    pub(crate) kind: CVKind,
    /// Candidate penalties to evaluate.
    pub(crate) candidates: &'a [T],
    /// Random seed for reproducible fold shuffling (K-Fold only).
    pub(crate) seed: Option<u64>,
}

impl<'a, T> CVConfig<'a, T> {
    /// Set the random seed for reproducible K-Fold cross-validation.
    ///
    /// Without a seed, folds are contiguous blocks of samples in their
    /// original order.
    ///
    /// # Note
    ///
    /// This only affects K-Fold CV. LOOCV is deterministic and ignores the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Get the candidate slice.
    pub fn candidates(&self) -> &[T] {
        self.candidates
    }

    /// Get the CV kind for internal use.
    pub(crate) fn kind(&self) -> CVKind {
        self.kind
    }

    /// Get the seed for internal use.
    pub(crate) fn get_seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Create a K-fold cross-validation configuration over candidate alphas.
#[allow(non_snake_case)]
pub fn KFold<T>(k: usize, alphas: &[T]) -> CVConfig<'_, T> {
    CVConfig {
        kind: CVKind::KFold(k),
        candidates: alphas,
        seed: None,
    }
}

/// Create a leave-one-out cross-validation configuration over candidate alphas.
#[allow(non_snake_case)]
pub fn LOOCV<T>(alphas: &[T]) -> CVConfig<'_, T> {
    CVConfig {
        kind: CVKind::LOOCV,
        candidates: alphas,
        seed: None,
    }
}

// ============================================================================
// Splits
// ============================================================================

/// One train/test partition of sample indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Training sample indices.
    pub train: Vec<usize>,
    /// Held-out sample indices.
    pub test: Vec<usize>,
}

// ============================================================================
// Cross-Validation Execution
// ============================================================================

impl CVKind {
    // ========================================================================
    // Public API
    // ========================================================================

    /// Number of samples needed to run this strategy.
    pub fn min_samples(self) -> usize {
        match self {
            CVKind::KFold(k) => k.max(2),
            CVKind::LOOCV => 2,
        }
    }

    /// Partition `0..n_samples` into train/test splits.
    pub fn splits(self, n_samples: usize, seed: Option<u64>) -> Result<Vec<Split>, AlignError> {
        let min = self.min_samples();
        if n_samples < min {
            return Err(AlignError::TooFewSamples {
                got: n_samples,
                min,
            });
        }

        match self {
            CVKind::KFold(k) => {
                if k < 2 {
                    return Err(AlignError::InvalidFolds(k));
                }
                Ok(Self::kfold_splits(n_samples, k, seed))
            }
            CVKind::LOOCV => Ok(Self::kfold_splits(n_samples, n_samples, None)),
        }
    }

    /// Run cross-validation and return the best candidate with the mean
    /// held-out error of every candidate.
    ///
    /// `error_fn(train, test, candidate)` fits on `train` and returns the
    /// error on `test`.
    pub fn run<T, F>(
        self,
        n_samples: usize,
        candidates: &[T],
        seed: Option<u64>,
        error_fn: F,
    ) -> Result<(T, Vec<T>), AlignError>
    where
        T: Float,
        F: Fn(&[usize], &[usize], T) -> Result<T, AlignError>,
    {
        let splits = self.splits(n_samples, seed)?;
        let mut scores = Vec::with_capacity(candidates.len());

        for &candidate in candidates {
            let mut total = T::zero();
            for split in &splits {
                total = total + error_fn(&split.train, &split.test, candidate)?;
            }
            scores.push(total / T::from(splits.len()).unwrap());
        }

        Ok(Self::select_best(candidates, scores))
    }

    // ========================================================================
    // Internal Cross-Validation Implementations
    // ========================================================================

    /// Select the candidate with the lowest score.
    fn select_best<T: Float>(candidates: &[T], scores: Vec<T>) -> (T, Vec<T>) {
        if candidates.is_empty() {
            return (T::zero(), scores);
        }

        let best_idx = scores
            .iter()
            .enumerate()
            .min_by(|(i, a), (j, b)| {
                a.partial_cmp(b)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| i.cmp(j))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        (candidates[best_idx], scores)
    }

    /// Contiguous folds over (optionally shuffled) indices; the first
    /// `n % k` folds hold one extra sample.
    fn kfold_splits(n: usize, k: usize, seed: Option<u64>) -> Vec<Split> {
        let mut indices: Vec<usize> = (0..n).collect();
        if let Some(s) = seed {
            SimpleRng::new(s).shuffle(&mut indices);
        }

        let base = n / k;
        let extra = n % k;
        let mut test_start = 0;
        (0..k)
            .map(|fold| {
                let size = base + usize::from(fold < extra);
                let test_end = test_start + size;
                let mut train = Vec::with_capacity(n - (test_end - test_start));
                train.extend_from_slice(&indices[..test_start]);
                train.extend_from_slice(&indices[test_end..]);
                let split = Split {
                    train,
                    test: indices[test_start..test_end].to_vec(),
                };
                test_start = test_end;
                split
            })
            .collect()
    }
}
