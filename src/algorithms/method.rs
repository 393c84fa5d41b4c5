//! Alignment methods and fitted transforms.
//!
//! ## Purpose
//!
//! This module ties the individual alignment algorithms together: it names
//! the available methods, carries their parameters, fits one method on a
//! pair of signal blocks and applies the resulting transform to new data.
//!
//! ## Key concepts
//!
//! * **AlignmentMethod**: Which family of transform to fit.
//! * **MethodConfig**: Method plus all method-specific parameters.
//! * **FittedTransform**: The learned map, applied as `X ↦ f(X)` with the
//!   same voxel count on both sides.
//!
//! ## Invariants
//!
//! * A fitted transform maps `n x p` blocks to `n x p` blocks.

use num_traits::Float;

use crate::algorithms::permutation::{apply_permutation, optimal_permutation};
use crate::algorithms::procrustes::scaled_procrustes;
use crate::algorithms::ridge::{ridge_cv, DEFAULT_ALPHAS};
use crate::algorithms::transport::{transport_coupling, DEFAULT_MAX_ITER, DEFAULT_REG, DEFAULT_TOL};
use crate::evaluation::cv::CVKind;
use crate::math::distance::DistanceLinalg;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

// ============================================================================
// Method Selection
// ============================================================================

/// Family of transform fitted on each parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMethod {
    /// Baseline: `RX = X`.
    Identity,

    /// Orthogonal Procrustes with optional global scaling.
    #[default]
    ScaledOrthogonal,

    /// Ridge regression with cross-validated penalty.
    Ridge,

    /// Optimal voxel permutation.
    Hungarian,

    /// Entropic optimal-transport coupling.
    OptimalTransport,
}

impl AlignmentMethod {
    /// Human-readable method name.
    pub fn name(self) -> &'static str {
        match self {
            AlignmentMethod::Identity => "identity",
            AlignmentMethod::ScaledOrthogonal => "scaled_orthogonal",
            AlignmentMethod::Ridge => "ridge_cv",
            AlignmentMethod::Hungarian => "permutation",
            AlignmentMethod::OptimalTransport => "optimal_transport",
        }
    }
}

// ============================================================================
// Method Configuration
// ============================================================================

/// Method and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodConfig<T> {
    /// Transform family.
    pub method: AlignmentMethod,
    /// Fit a global scale on top of the orthogonal map.
    pub scaling: bool,
    /// Candidate ridge penalties.
    pub alphas: Vec<T>,
    /// Ridge cross-validation strategy.
    pub cv_kind: CVKind,
    /// Ridge fold shuffling seed.
    pub cv_seed: Option<u64>,
    /// Fit a ridge intercept.
    pub fit_intercept: bool,
    /// Entropic regularization for optimal transport.
    pub reg: T,
    /// Sinkhorn iteration cap.
    pub max_iter: usize,
    /// Sinkhorn marginal tolerance.
    pub tol: T,
}

impl<T: Float> Default for MethodConfig<T> {
    fn default() -> Self {
        Self {
            method: AlignmentMethod::default(),
            scaling: true,
            alphas: DEFAULT_ALPHAS.iter().map(|&a| T::from(a).unwrap()).collect(),
            cv_kind: CVKind::default(),
            cv_seed: None,
            fit_intercept: true,
            reg: T::from(DEFAULT_REG).unwrap(),
            max_iter: DEFAULT_MAX_ITER,
            tol: T::from(DEFAULT_TOL).unwrap(),
        }
    }
}

impl<T: FloatLinalg + DistanceLinalg> MethodConfig<T> {
    /// Fit the configured method mapping `x` onto `y`.
    pub fn fit(&self, x: &Matrix<T>, y: &Matrix<T>) -> Result<FittedTransform<T>, AlignError> {
        match self.method {
            AlignmentMethod::Identity => Ok(FittedTransform::Identity),
            AlignmentMethod::ScaledOrthogonal => {
                let sol = scaled_procrustes(x, y, self.scaling, None)?;
                Ok(FittedTransform::Orthogonal {
                    rotation: sol.rotation,
                    scale: sol.scale,
                })
            }
            AlignmentMethod::Ridge => {
                let (sol, _) = ridge_cv(
                    x,
                    y,
                    &self.alphas,
                    self.cv_kind,
                    self.cv_seed,
                    self.fit_intercept,
                )?;
                Ok(FittedTransform::Linear {
                    coef: sol.coef,
                    intercept: sol.intercept,
                    alpha: sol.alpha,
                })
            }
            AlignmentMethod::Hungarian => Ok(FittedTransform::Permutation {
                mapping: optimal_permutation(x, y)?,
            }),
            AlignmentMethod::OptimalTransport => Ok(FittedTransform::Transport {
                coupling: transport_coupling(x, y, self.reg, self.max_iter, self.tol)?,
            }),
        }
    }
}

// ============================================================================
// Fitted Transform
// ============================================================================

/// Learned map from source to target voxel space.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedTransform<T> {
    /// `X ↦ X`.
    Identity,

    /// `X ↦ scale · X R`.
    Orthogonal {
        /// Orthogonal `p x p` matrix.
        rotation: Matrix<T>,
        /// Global scale.
        scale: T,
    },

    /// `X ↦ X W + b`.
    Linear {
        /// `p x p` coefficients.
        coef: Matrix<T>,
        /// Intercept per target voxel.
        intercept: Vec<T>,
        /// Selected ridge penalty.
        alpha: T,
    },

    /// Column `i` moves to column `mapping[i]`.
    Permutation {
        /// Target voxel of each source voxel.
        mapping: Vec<usize>,
    },

    /// `X ↦ X P`, rows of `P` sum to one.
    Transport {
        /// Scaled `p x p` coupling.
        coupling: Matrix<T>,
    },
}

impl<T: FloatLinalg> FittedTransform<T> {
    /// Apply the transform to an `n x p` block.
    pub fn apply(&self, x: &Matrix<T>) -> Matrix<T> {
        match self {
            FittedTransform::Identity => x.clone(),
            FittedTransform::Orthogonal { rotation, scale } => x.matmul(rotation).scaled(*scale),
            FittedTransform::Linear {
                coef, intercept, ..
            } => {
                let mut out = x.matmul(coef);
                out.add_to_columns(intercept);
                out
            }
            FittedTransform::Permutation { mapping } => apply_permutation(x, mapping),
            FittedTransform::Transport { coupling } => x.matmul(coupling),
        }
    }

    /// Ridge penalty selected for this transform, if any.
    pub fn alpha(&self) -> Option<T> {
        match self {
            FittedTransform::Linear { alpha, .. } => Some(*alpha),
            _ => None,
        }
    }
}
