//! Optimal-transport alignment.
//!
//! ## Purpose
//!
//! Derives a soft voxel-to-voxel mapping from the entropic-regularized
//! optimal coupling between source and target voxel profiles.
//!
//! ## Design notes
//!
//! * **Cost**: Euclidean distance between source and target voxel profiles.
//! * **Marginals**: Uniform on both sides.
//! * **Scaling**: The coupling is multiplied by `n_voxels` so each row sums to
//!   one; the transform is `X ↦ X P`.
//!
//! ## Non-goals
//!
//! * This module does not use unbalanced or partial transport.

use tracing::warn;

use crate::math::distance::{pairwise_column_distances, DistanceLinalg};
use crate::math::sinkhorn::sinkhorn_log;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Default entropic regularization.
pub const DEFAULT_REG: f64 = 1.0;

/// Default Sinkhorn iteration cap.
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Default marginal tolerance.
pub const DEFAULT_TOL: f64 = 1e-3;

/// Compute the scaled transport coupling between the voxels of `x` and `y`.
pub fn transport_coupling<T: DistanceLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
    reg: T,
    max_iter: usize,
    tol: T,
) -> Result<Matrix<T>, AlignError> {
    if x.shape() != y.shape() {
        return Err(AlignError::ShapeMismatch {
            expected: x.shape(),
            got: y.shape(),
        });
    }

    let p = x.cols();
    let cost = pairwise_column_distances(x, y, false);
    let p_t = T::from(p).unwrap();
    let uniform = vec![T::one() / p_t; p];

    let plan = sinkhorn_log(&uniform, &uniform, cost.as_slice(), reg, max_iter, tol);
    if !plan.converged {
        warn!(
            iterations = plan.iterations,
            marginal_error = plan.marginal_error.to_f64().unwrap_or(f64::NAN),
            "Sinkhorn did not reach tolerance"
        );
    }

    let coupling: Vec<T> = plan.coupling.into_iter().map(|v| v * p_t).collect();
    Matrix::new(p, p, coupling)
}
