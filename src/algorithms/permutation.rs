//! Optimal voxel permutation (Hungarian alignment).
//!
//! ## Purpose
//!
//! Matches each source voxel to exactly one target voxel so that the sum
//! of Euclidean distances between matched profiles is minimal.
//!
//! ## Invariants
//!
//! * The mapping is a bijection on `0..n_voxels`.

use crate::math::assignment::linear_sum_assignment;
use crate::math::distance::{pairwise_column_distances, DistanceLinalg};
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Compute the optimal permutation of `x`'s voxels toward `y`'s.
///
/// `mapping[i]` is the target voxel receiving source voxel `i`.
pub fn optimal_permutation<T: DistanceLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
) -> Result<Vec<usize>, AlignError> {
    if x.shape() != y.shape() {
        return Err(AlignError::ShapeMismatch {
            expected: x.shape(),
            got: y.shape(),
        });
    }
    let dist = pairwise_column_distances(x, y, false);
    linear_sum_assignment(dist.as_slice(), dist.rows(), dist.cols())
}

/// Apply a voxel mapping: column `i` of `x` lands in column `mapping[i]`.
pub fn apply_permutation<T: num_traits::Float>(x: &Matrix<T>, mapping: &[usize]) -> Matrix<T> {
    let mut out = Matrix::zeros(x.rows(), x.cols());
    out.scatter_columns(mapping, x);
    out
}
