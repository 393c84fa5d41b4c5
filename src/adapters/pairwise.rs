//! Pairwise adapter: align one source subject onto one target subject.
//!
//! ## Purpose
//!
//! This module provides the pairwise execution adapter. It learns a
//! piecewise transform from paired source/target recordings of the same
//! stimuli and applies it to new source data.
//!
//! ## Design notes
//!
//! * **Processing**: Fits every parcel (and bag) in a single call.
//! * **Delegation**: Delegates computation to the piecewise executor.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Invariants
//!
//! * Source and target must have the same shape `n_samples x n_voxels`.
//! * All values must be finite.
//! * Transformed output has the shape of its input.
//!
//! ## Non-goals
//!
//! * This adapter does not build a common space (use the template adapter).
//! * This adapter does not handle missing values.

use core::fmt;

use crate::algorithms::method::{AlignmentMethod, MethodConfig};
use crate::engine::executor::{AlignmentConfig, Bag, PiecewiseExecutor};
use crate::engine::parcellation::{Parcellation, DEFAULT_KMEANS_ITER};
use crate::engine::validator::Validator;
use crate::evaluation::cv::CVKind;
use crate::math::distance::DistanceLinalg;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

// ============================================================================
// Pairwise Builder
// ============================================================================

/// Builder for pairwise alignment.
#[derive(Debug, Clone)]
pub struct PairwiseAlignmentBuilder<T> {
    /// Transform family fitted on each parcel
    pub method: AlignmentMethod,

    /// Global scaling on top of the orthogonal map
    pub scaling: bool,

    /// Candidate ridge penalties
    pub alphas: Vec<T>,

    /// Ridge cross-validation strategy
    pub cv_kind: CVKind,

    /// Ridge fold shuffling seed
    pub cv_seed: Option<u64>,

    /// Fit a ridge intercept
    pub fit_intercept: bool,

    /// Entropic regularization (optimal transport)
    pub reg: T,

    /// Sinkhorn iteration cap
    pub max_iter: usize,

    /// Sinkhorn tolerance
    pub tol: T,

    /// Voxel grouping
    pub parcellation: Parcellation,

    /// Number of bootstrap parcellations
    pub n_bags: usize,

    /// Seed for clustering and bootstrap
    pub seed: u64,

    /// K-means iteration cap
    pub kmeans_iter: usize,

    /// Deferred error from adapter conversion
    pub deferred_error: Option<AlignError>,

    /// Tracks if any parameter was set multiple times (for validation)
    #[doc(hidden)]
    pub(crate) duplicate_param: Option<&'static str>,

    /// Parallel execution hint.
    #[doc(hidden)]
    pub parallel: Option<bool>,
}

impl<T: FloatLinalg + DistanceLinalg> Default for PairwiseAlignmentBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg + DistanceLinalg> PairwiseAlignmentBuilder<T> {
    /// Create a new pairwise builder with default parameters.
    fn new() -> Self {
        let method = MethodConfig::default();
        Self {
            method: method.method,
            scaling: method.scaling,
            alphas: method.alphas,
            cv_kind: method.cv_kind,
            cv_seed: method.cv_seed,
            fit_intercept: method.fit_intercept,
            reg: method.reg,
            max_iter: method.max_iter,
            tol: method.tol,
            parcellation: Parcellation::default(),
            n_bags: 1,
            seed: 0,
            kmeans_iter: DEFAULT_KMEANS_ITER,
            deferred_error: None,
            duplicate_param: None,
            parallel: None,
        }
    }

    // ========================================================================
    // Setters
    // ========================================================================

    /// Set the alignment method.
    pub fn method(mut self, method: AlignmentMethod) -> Self {
        self.method = method;
        self
    }

    /// Enable or disable global scaling of the orthogonal map.
    pub fn scaling(mut self, scaling: bool) -> Self {
        self.scaling = scaling;
        self
    }

    /// Set the candidate ridge penalties.
    pub fn alphas(mut self, alphas: Vec<T>) -> Self {
        self.alphas = alphas;
        self
    }

    /// Set the ridge cross-validation strategy.
    pub fn cv_kind(mut self, kind: CVKind) -> Self {
        self.cv_kind = kind;
        self
    }

    /// Enable or disable the ridge intercept.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set the entropic regularization.
    pub fn regularization(mut self, reg: T) -> Self {
        self.reg = reg;
        self
    }

    /// Set the Sinkhorn iteration cap.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the Sinkhorn tolerance.
    pub fn tolerance(mut self, tol: T) -> Self {
        self.tol = tol;
        self
    }

    /// Set the parcellation.
    pub fn parcellation(mut self, parcellation: Parcellation) -> Self {
        self.parcellation = parcellation;
        self
    }

    /// Set the number of bootstrap parcellations.
    pub fn n_bags(mut self, n_bags: usize) -> Self {
        self.n_bags = n_bags;
        self
    }

    /// Set the clustering and bootstrap seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the k-means iteration cap.
    pub fn kmeans_iterations(mut self, n: usize) -> Self {
        self.kmeans_iter = n;
        self
    }

    /// Set parallel execution hint.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the pairwise aligner.
    pub fn build(self) -> Result<PairwiseAlignment<T>, AlignError> {
        if let Some(err) = self.deferred_error {
            return Err(err);
        }

        Validator::validate_no_duplicates(self.duplicate_param)?;

        if self.method == AlignmentMethod::Ridge {
            Validator::validate_alphas(&self.alphas)?;
            if let CVKind::KFold(k) = self.cv_kind {
                Validator::validate_kfold(k)?;
            }
        }
        if self.method == AlignmentMethod::OptimalTransport {
            Validator::validate_regularization(self.reg)?;
            Validator::validate_tolerance(self.tol)?;
            Validator::validate_iterations(self.max_iter)?;
        }
        Validator::validate_bags(self.n_bags)?;
        Validator::validate_iterations(self.kmeans_iter)?;

        let config = AlignmentConfig {
            method: MethodConfig {
                method: self.method,
                scaling: self.scaling,
                alphas: self.alphas,
                cv_kind: self.cv_kind,
                cv_seed: self.cv_seed,
                fit_intercept: self.fit_intercept,
                reg: self.reg,
                max_iter: self.max_iter,
                tol: self.tol,
            },
            parcellation: self.parcellation,
            n_bags: self.n_bags,
            seed: self.seed,
            kmeans_iter: self.kmeans_iter,
            parallel: self.parallel.unwrap_or(cfg!(feature = "parallel")),
        };

        Ok(PairwiseAlignment { config })
    }
}

// ============================================================================
// Pairwise Aligner
// ============================================================================

/// Validated pairwise aligner, ready to fit.
#[derive(Debug, Clone)]
pub struct PairwiseAlignment<T> {
    config: AlignmentConfig<T>,
}

impl<T: FloatLinalg + DistanceLinalg> PairwiseAlignment<T> {
    /// Learn the piecewise map from `source` onto `target`.
    pub fn fit(
        &self,
        source: &Matrix<T>,
        target: &Matrix<T>,
    ) -> Result<FittedPairwise<T>, AlignError> {
        Validator::validate_pair(source, target)?;

        let bags = PiecewiseExecutor::fit(source, target, &self.config)?;

        Ok(FittedPairwise {
            bags,
            n_voxels: source.cols(),
            method: self.config.method.method,
            parallel: self.config.parallel,
        })
    }

    /// Configuration used by [`fit`](Self::fit).
    pub fn config(&self) -> &AlignmentConfig<T> {
        &self.config
    }
}

// ============================================================================
// Fitted Pairwise Alignment
// ============================================================================

/// Result of a pairwise fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedPairwise<T> {
    pub(crate) bags: Vec<Bag<T>>,
    pub(crate) n_voxels: usize,
    pub(crate) method: AlignmentMethod,
    pub(crate) parallel: bool,
}

impl<T: FloatLinalg> FittedPairwise<T> {
    /// Map `x` (`n x n_voxels`, any number of samples) into target space.
    pub fn transform(&self, x: &Matrix<T>) -> Result<Matrix<T>, AlignError> {
        Validator::validate_transform_input(x, self.n_voxels)?;
        Ok(PiecewiseExecutor::transform_bags(
            x,
            &self.bags,
            self.parallel,
        ))
    }

    /// Parcel label of each voxel in the first bag.
    pub fn labels(&self) -> &[usize] {
        self.bags
            .first()
            .map(|b| b.labels.as_slice())
            .unwrap_or(&[])
    }

    /// Number of parcels in the first bag.
    pub fn n_pieces(&self) -> usize {
        self.bags.first().map_or(0, |b| b.pieces.len())
    }

    /// Number of fitted bags.
    pub fn n_bags(&self) -> usize {
        self.bags.len()
    }

    /// Number of voxels the transform was fitted on.
    pub fn n_voxels(&self) -> usize {
        self.n_voxels
    }

    /// Method fitted on each parcel.
    pub fn method(&self) -> AlignmentMethod {
        self.method
    }

    /// Selected ridge penalty of every piece, bag by bag.
    ///
    /// Empty unless the method is [`AlignmentMethod::Ridge`].
    pub fn ridge_alphas(&self) -> Vec<T> {
        self.bags
            .iter()
            .flat_map(|b| b.pieces.iter().filter_map(|p| p.transform.alpha()))
            .collect()
    }

    /// Fitted bags.
    pub fn bags(&self) -> &[Bag<T>] {
        &self.bags
    }
}

impl<T: FloatLinalg> fmt::Display for FittedPairwise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pairwise alignment")?;
        writeln!(f, "  Method:  {}", self.method.name())?;
        writeln!(f, "  Voxels:  {}", self.n_voxels)?;
        writeln!(f, "  Pieces:  {}", self.n_pieces())?;
        write!(f, "  Bags:    {}", self.n_bags())?;

        let alphas = self.ridge_alphas();
        if !alphas.is_empty() {
            let mut distinct: Vec<f64> = alphas.iter().filter_map(|a| a.to_f64()).collect();
            distinct.sort_by(|a, b| a.total_cmp(b));
            distinct.dedup();
            write!(f, "\n  Alphas:  {:?}", distinct)?;
        }
        Ok(())
    }
}
