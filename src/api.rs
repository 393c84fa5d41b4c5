//! High-level API for functional alignment.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for configuring the alignment method, its parameters and
//! the parcellation, and for choosing an execution adapter (Pairwise or
//! Template).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Uses marker types to transition to specialized adapter builders.
//! * **Validated**: Parameters are validated when `.build()` is called on the adapter.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! * **Execution Adapters**: Pairwise and Template modes.
//! * **Configuration Flow**: Builder pattern ending in `.adapter(Adapter::Type)`.
//!
//! ### Configuration Flow
//!
//! 1. Create an [`AlignerBuilder`] via `Aligner::new()`.
//! 2. Chain configuration methods (`.method()`, `.parcellation()`, etc.).
//! 3. Select an adapter via `.adapter(Adapter::Pairwise)` to get an execution builder.

use crate::adapters::pairwise::PairwiseAlignmentBuilder;
use crate::adapters::template::TemplateAlignmentBuilder;
use crate::evaluation::cv::{CVConfig, CVKind};
use crate::math::distance::DistanceLinalg;
use crate::math::linalg::FloatLinalg;

// Publicly re-exported types
pub use crate::adapters::pairwise::{FittedPairwise, PairwiseAlignment};
pub use crate::adapters::template::{FittedTemplate, TemplateAlignment};
pub use crate::algorithms::method::AlignmentMethod;
pub use crate::engine::parcellation::Parcellation;
pub use crate::evaluation::cv::{KFold, LOOCV};
pub use crate::evaluation::scoring::Score;
pub use crate::primitives::errors::AlignError;
pub use crate::primitives::matrix::Matrix;

/// Marker types for selecting execution adapters.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Pairwise, Template};
}

/// Fluent builder for configuring alignment parameters and execution modes.
#[derive(Debug, Clone)]
pub struct AlignerBuilder<T: FloatLinalg + DistanceLinalg> {
    /// Transform family fitted on each parcel.
    pub method: Option<AlignmentMethod>,

    /// Global scaling of the orthogonal map.
    pub scaling: Option<bool>,

    /// Candidate ridge penalties.
    pub cv_alphas: Option<Vec<T>>,

    /// CV strategy (K-Fold/LOOCV).
    pub(crate) cv_kind: Option<CVKind>,

    /// CV seed for reproducibility.
    pub(crate) cv_seed: Option<u64>,

    /// Fit a ridge intercept.
    pub fit_intercept: Option<bool>,

    /// Entropic regularization (optimal transport).
    pub regularization: Option<T>,

    /// Sinkhorn iteration cap.
    pub max_iter: Option<usize>,

    /// Sinkhorn tolerance.
    pub tolerance: Option<T>,

    /// Voxel grouping.
    pub parcellation: Option<Parcellation>,

    /// Number of bootstrap parcellations.
    pub n_bags: Option<usize>,

    /// Template refinement iterations (Template only).
    pub n_iter: Option<usize>,

    /// Clustering and bootstrap seed.
    pub seed: Option<u64>,

    /// K-means iteration cap.
    pub kmeans_iterations: Option<usize>,

    /// Parallel execution across parcels.
    pub parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: FloatLinalg + DistanceLinalg> Default for AlignerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatLinalg + DistanceLinalg> AlignerBuilder<T> {
    /// Select an execution adapter to transition to an execution builder.
    pub fn adapter<A>(self, _adapter: A) -> A::Output
    where
        A: AlignerAdapter<T>,
    {
        A::convert(self)
    }

    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            method: None,
            scaling: None,
            cv_alphas: None,
            cv_kind: None,
            cv_seed: None,
            fit_intercept: None,
            regularization: None,
            max_iter: None,
            tolerance: None,
            parcellation: None,
            n_bags: None,
            n_iter: None,
            seed: None,
            kmeans_iterations: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the alignment method (default: scaled orthogonal).
    pub fn method(mut self, method: AlignmentMethod) -> Self {
        if self.method.is_some() {
            self.duplicate_param = Some("method");
        }
        self.method = Some(method);
        self
    }

    /// Enable or disable global scaling of the orthogonal map (default: on).
    pub fn scaling(mut self, scaling: bool) -> Self {
        if self.scaling.is_some() {
            self.duplicate_param = Some("scaling");
        }
        self.scaling = Some(scaling);
        self
    }

    /// Choose the ridge penalty by cross-validation over candidate alphas.
    pub fn cross_validate(mut self, config: CVConfig<'_, T>) -> Self {
        if self.cv_alphas.is_some() {
            self.duplicate_param = Some("cross_validate");
        }
        self.cv_alphas = Some(config.candidates().to_vec());
        self.cv_kind = Some(config.kind());
        self.cv_seed = config.get_seed();
        self
    }

    /// Enable or disable the ridge intercept (default: on).
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        if self.fit_intercept.is_some() {
            self.duplicate_param = Some("fit_intercept");
        }
        self.fit_intercept = Some(fit_intercept);
        self
    }

    /// Set the entropic regularization of optimal transport (default: 1).
    pub fn regularization(mut self, reg: T) -> Self {
        if self.regularization.is_some() {
            self.duplicate_param = Some("regularization");
        }
        self.regularization = Some(reg);
        self
    }

    /// Set the Sinkhorn iteration cap (default: 1000).
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        if self.max_iter.is_some() {
            self.duplicate_param = Some("max_iter");
        }
        self.max_iter = Some(max_iter);
        self
    }

    /// Set the Sinkhorn marginal tolerance (default: 1e-3).
    pub fn tolerance(mut self, tol: T) -> Self {
        if self.tolerance.is_some() {
            self.duplicate_param = Some("tolerance");
        }
        self.tolerance = Some(tol);
        self
    }

    /// Set the voxel parcellation (default: a single piece).
    pub fn parcellation(mut self, parcellation: Parcellation) -> Self {
        if self.parcellation.is_some() {
            self.duplicate_param = Some("parcellation");
        }
        self.parcellation = Some(parcellation);
        self
    }

    /// Set the number of bootstrap parcellations (default: 1).
    pub fn n_bags(mut self, n_bags: usize) -> Self {
        if self.n_bags.is_some() {
            self.duplicate_param = Some("n_bags");
        }
        self.n_bags = Some(n_bags);
        self
    }

    /// Set the number of template refinement iterations (Template only).
    pub fn n_iter(mut self, n_iter: usize) -> Self {
        if self.n_iter.is_some() {
            self.duplicate_param = Some("n_iter");
        }
        self.n_iter = Some(n_iter);
        self
    }

    /// Set the clustering and bootstrap seed (default: 0).
    pub fn seed(mut self, seed: u64) -> Self {
        if self.seed.is_some() {
            self.duplicate_param = Some("seed");
        }
        self.seed = Some(seed);
        self
    }

    /// Set the k-means iteration cap (default: 100).
    pub fn kmeans_iterations(mut self, n: usize) -> Self {
        if self.kmeans_iterations.is_some() {
            self.duplicate_param = Some("kmeans_iterations");
        }
        self.kmeans_iterations = Some(n);
        self
    }

    /// Enable or disable parallel execution across parcels.
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }
}

/// Trait for transitioning from a generic builder to an execution builder.
pub trait AlignerAdapter<T: FloatLinalg + DistanceLinalg> {
    /// The output execution builder.
    type Output;

    /// Convert a generic [`AlignerBuilder`] into a specialized execution builder.
    fn convert(builder: AlignerBuilder<T>) -> Self::Output;
}

/// Copy the parameters shared by every adapter.
fn apply_shared<T: FloatLinalg + DistanceLinalg>(
    builder: &AlignerBuilder<T>,
    result: &mut PairwiseAlignmentBuilder<T>,
) {
    if let Some(m) = builder.method {
        result.method = m;
    }
    if let Some(s) = builder.scaling {
        result.scaling = s;
    }
    if let Some(ref alphas) = builder.cv_alphas {
        result.alphas = alphas.clone();
    }
    if let Some(kind) = builder.cv_kind {
        result.cv_kind = kind;
    }
    result.cv_seed = builder.cv_seed;
    if let Some(fi) = builder.fit_intercept {
        result.fit_intercept = fi;
    }
    if let Some(reg) = builder.regularization {
        result.reg = reg;
    }
    if let Some(mi) = builder.max_iter {
        result.max_iter = mi;
    }
    if let Some(tol) = builder.tolerance {
        result.tol = tol;
    }
    if let Some(ref p) = builder.parcellation {
        result.parcellation = p.clone();
    }
    if let Some(nb) = builder.n_bags {
        result.n_bags = nb;
    }
    if let Some(seed) = builder.seed {
        result.seed = seed;
    }
    if let Some(ki) = builder.kmeans_iterations {
        result.kmeans_iter = ki;
    }
    if let Some(p) = builder.parallel {
        result.parallel = Some(p);
    }

    result.duplicate_param = builder.duplicate_param;
}

/// Marker for source-to-target alignment.
#[derive(Debug, Clone, Copy)]
pub struct Pairwise;

impl<T: FloatLinalg + DistanceLinalg> AlignerAdapter<T> for Pairwise {
    type Output = PairwiseAlignmentBuilder<T>;

    fn convert(builder: AlignerBuilder<T>) -> Self::Output {
        let mut result = PairwiseAlignmentBuilder::default();
        apply_shared(&builder, &mut result);

        if builder.n_iter.is_some() {
            result.deferred_error = Some(AlignError::UnsupportedFeature {
                adapter: "Pairwise",
                feature: "n_iter",
            });
        }

        result
    }
}

/// Marker for group template alignment.
#[derive(Debug, Clone, Copy)]
pub struct Template;

impl<T: FloatLinalg + DistanceLinalg> AlignerAdapter<T> for Template {
    type Output = TemplateAlignmentBuilder<T>;

    fn convert(builder: AlignerBuilder<T>) -> Self::Output {
        let mut result = TemplateAlignmentBuilder::default();
        apply_shared(&builder, &mut result.pairwise);

        if let Some(n) = builder.n_iter {
            result.n_iter = n;
        }

        result
    }
}
