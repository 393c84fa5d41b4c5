//! Template adapter: align many subjects into a common space.
//!
//! ## Purpose
//!
//! This module builds a group template from several subjects recorded on the
//! same stimuli and learns, for each subject, the piecewise map onto it.
//!
//! ## Design notes
//!
//! * **Initialization**: The template starts as the element-wise mean of all
//!   subjects.
//! * **Refinement**: Each iteration aligns every subject onto the current
//!   template and replaces it with the mean of the aligned subjects.
//! * **Delegation**: Every per-subject fit goes through the piecewise
//!   executor, so parcellation, bagging and parallelism behave exactly as in
//!   the pairwise adapter.
//!
//! ## Invariants
//!
//! * At least two subjects, all with the same shape.
//! * The template has the subjects' shape.
//!
//! ## Non-goals
//!
//! * This adapter does not weight subjects differently.

use tracing::debug;

use crate::adapters::pairwise::PairwiseAlignmentBuilder;
use crate::algorithms::method::AlignmentMethod;
use crate::engine::executor::{AlignmentConfig, Bag, PiecewiseExecutor};
use crate::engine::parcellation::Parcellation;
use crate::engine::validator::Validator;
use crate::evaluation::cv::CVKind;
use crate::math::distance::DistanceLinalg;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Default number of template refinement iterations.
pub const DEFAULT_TEMPLATE_ITER: usize = 2;

// ============================================================================
// Template Builder
// ============================================================================

/// Builder for template alignment.
#[derive(Debug, Clone)]
pub struct TemplateAlignmentBuilder<T> {
    /// Per-subject alignment parameters
    pub pairwise: PairwiseAlignmentBuilder<T>,

    /// Template refinement iterations
    pub n_iter: usize,
}

impl<T: FloatLinalg + DistanceLinalg> Default for TemplateAlignmentBuilder<T> {
    fn default() -> Self {
        Self {
            pairwise: PairwiseAlignmentBuilder::default(),
            n_iter: DEFAULT_TEMPLATE_ITER,
        }
    }
}

impl<T: FloatLinalg + DistanceLinalg> TemplateAlignmentBuilder<T> {
    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the alignment method.
    pub fn method(mut self, method: AlignmentMethod) -> Self {
        self.pairwise = self.pairwise.method(method);
        self
    }

    /// Enable or disable global scaling of the orthogonal map.
    pub fn scaling(mut self, scaling: bool) -> Self {
        self.pairwise = self.pairwise.scaling(scaling);
        self
    }

    /// Set the candidate ridge penalties.
    pub fn alphas(mut self, alphas: Vec<T>) -> Self {
        self.pairwise = self.pairwise.alphas(alphas);
        self
    }

    /// Set the ridge cross-validation strategy.
    pub fn cv_kind(mut self, kind: CVKind) -> Self {
        self.pairwise = self.pairwise.cv_kind(kind);
        self
    }

    /// Enable or disable the ridge intercept.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.pairwise = self.pairwise.fit_intercept(fit_intercept);
        self
    }

    /// Set the entropic regularization.
    pub fn regularization(mut self, reg: T) -> Self {
        self.pairwise = self.pairwise.regularization(reg);
        self
    }

    /// Set the Sinkhorn iteration cap.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.pairwise = self.pairwise.max_iter(max_iter);
        self
    }

    /// Set the Sinkhorn tolerance.
    pub fn tolerance(mut self, tol: T) -> Self {
        self.pairwise = self.pairwise.tolerance(tol);
        self
    }

    /// Set the parcellation.
    pub fn parcellation(mut self, parcellation: Parcellation) -> Self {
        self.pairwise = self.pairwise.parcellation(parcellation);
        self
    }

    /// Set the number of bootstrap parcellations.
    pub fn n_bags(mut self, n_bags: usize) -> Self {
        self.pairwise = self.pairwise.n_bags(n_bags);
        self
    }

    /// Set the clustering and bootstrap seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.pairwise = self.pairwise.seed(seed);
        self
    }

    /// Set the k-means iteration cap.
    pub fn kmeans_iterations(mut self, n: usize) -> Self {
        self.pairwise = self.pairwise.kmeans_iterations(n);
        self
    }

    /// Set parallel execution hint.
    #[doc(hidden)]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.pairwise = self.pairwise.parallel(parallel);
        self
    }

    // ========================================================================
    // Template-Specific Setters
    // ========================================================================

    /// Set the number of template refinement iterations.
    pub fn n_iter(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the template aligner.
    pub fn build(self) -> Result<TemplateAlignment<T>, AlignError> {
        let pairwise = self.pairwise.build()?;
        Validator::validate_iterations(self.n_iter)?;

        Ok(TemplateAlignment {
            config: pairwise.config().clone(),
            n_iter: self.n_iter,
        })
    }
}

// ============================================================================
// Template Aligner
// ============================================================================

/// Validated template aligner, ready to fit.
#[derive(Debug, Clone)]
pub struct TemplateAlignment<T> {
    config: AlignmentConfig<T>,
    n_iter: usize,
}

impl<T: FloatLinalg + DistanceLinalg> TemplateAlignment<T> {
    /// Build the template and fit each subject's map onto it.
    pub fn fit(&self, subjects: &[Matrix<T>]) -> Result<FittedTemplate<T>, AlignError> {
        Validator::validate_subjects(subjects)?;

        let mut template = mean_of(subjects);
        debug!(
            n_subjects = subjects.len(),
            n_iter = self.n_iter,
            "building template"
        );

        for iter in 0..self.n_iter {
            let mut aligned = Vec::with_capacity(subjects.len());
            for subject in subjects {
                let bags = PiecewiseExecutor::fit(subject, &template, &self.config)?;
                aligned.push(PiecewiseExecutor::transform_bags(
                    subject,
                    &bags,
                    self.config.parallel,
                ));
            }
            let updated = mean_of(&aligned);

            let mut delta = updated.clone();
            delta.add_assign(&template.scaled(-T::one()));
            debug!(
                iter,
                change = delta.frobenius_norm().to_f64(),
                "template updated"
            );
            template = updated;
        }

        let subject_bags = subjects
            .iter()
            .map(|s| PiecewiseExecutor::fit(s, &template, &self.config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FittedTemplate {
            template,
            subject_bags,
            parallel: self.config.parallel,
        })
    }
}

/// Element-wise mean of same-shape matrices.
fn mean_of<T: FloatLinalg>(matrices: &[Matrix<T>]) -> Matrix<T> {
    let (rows, cols) = matrices[0].shape();
    let mut acc = Matrix::zeros(rows, cols);
    for m in matrices {
        acc.add_assign(m);
    }
    acc.scaled(T::one() / T::from(matrices.len()).unwrap())
}

// ============================================================================
// Fitted Template
// ============================================================================

/// Result of a template fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTemplate<T> {
    template: Matrix<T>,
    subject_bags: Vec<Vec<Bag<T>>>,
    parallel: bool,
}

impl<T: FloatLinalg> FittedTemplate<T> {
    /// Map data of subject `subject` into template space.
    pub fn transform(&self, subject: usize, x: &Matrix<T>) -> Result<Matrix<T>, AlignError> {
        let bags = self
            .subject_bags
            .get(subject)
            .ok_or(AlignError::SubjectOutOfRange {
                index: subject,
                n_subjects: self.subject_bags.len(),
            })?;
        Validator::validate_transform_input(x, self.template.cols())?;
        Ok(PiecewiseExecutor::transform_bags(x, bags, self.parallel))
    }

    /// Final template (`n_samples x n_voxels`).
    pub fn template(&self) -> &Matrix<T> {
        &self.template
    }

    /// Number of fitted subjects.
    pub fn n_subjects(&self) -> usize {
        self.subject_bags.len()
    }

    /// Fitted bags of one subject.
    pub fn subject_bags(&self, subject: usize) -> Option<&[Bag<T>]> {
        self.subject_bags.get(subject).map(Vec::as_slice)
    }
}
