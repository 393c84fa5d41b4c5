//! Distances between voxel profiles.
//!
//! ## Purpose
//!
//! The permutation and optimal-transport methods compare every source
//! voxel with every target voxel. A voxel's profile is its column of
//! samples; this module computes the pairwise Euclidean distances between
//! the columns of two signal matrices.
//!
//! ## Design notes
//!
//! * **Contiguous profiles**: Both inputs are transposed once so each profile
//!   is a contiguous slice.
//! * **SIMD**: `f64` uses a `wide::f64x2` kernel; `f32` stays scalar.
//!
//! ## Invariants
//!
//! * Distance is always non-negative.
//! * Output is `x.cols() x y.cols()`, row `i` holds distances from source voxel `i`.

use num_traits::Float;
use wide::f64x2;

use crate::primitives::matrix::Matrix;

// ============================================================================
// DistanceLinalg Trait
// ============================================================================

/// Squared Euclidean distance kernel, specialized per float type.
pub trait DistanceLinalg: Float {
    /// Squared Euclidean distance between two equally long vectors.
    fn squared_euclidean(a: &[Self], b: &[Self]) -> Self;
}

impl DistanceLinalg for f64 {
    #[inline]
    fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
        squared_euclidean_simd(a, b)
    }
}

impl DistanceLinalg for f32 {
    #[inline]
    fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
        squared_euclidean_scalar(a, b)
    }
}

/// Scalar squared Euclidean distance.
#[inline]
pub fn squared_euclidean_scalar<T: Float>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len(), "Profiles must have same length");
    a.iter()
        .zip(b.iter())
        .map(|(&ai, &bi)| {
            let diff = ai - bi;
            diff * diff
        })
        .fold(T::zero(), |acc, x| acc + x)
}

/// Squared Euclidean distance using SIMD, two lanes at a time.
#[inline]
pub fn squared_euclidean_simd(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Profiles must have same length");
    let n = a.len().min(b.len());
    let mut acc = f64x2::splat(0.0);

    let mut i = 0;
    while i + 2 <= n {
        let va = f64x2::new([a[i], a[i + 1]]);
        let vb = f64x2::new([b[i], b[i + 1]]);
        let d = va - vb;
        acc += d * d;
        i += 2;
    }

    let mut sum = acc.reduce_add();
    while i < n {
        let d = a[i] - b[i];
        sum += d * d;
        i += 1;
    }
    sum
}

// ============================================================================
// Pairwise Distances
// ============================================================================

/// Pairwise distances between the columns of `x` and the columns of `y`.
///
/// Returns squared distances when `squared` is set.
pub fn pairwise_column_distances<T: DistanceLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
    squared: bool,
) -> Matrix<T> {
    debug_assert_eq!(x.rows(), y.rows(), "Profiles must have same length");
    let xt = x.transpose();
    let yt = y.transpose();

    Matrix::from_fn(x.cols(), y.cols(), |i, j| {
        let d2 = T::squared_euclidean(xt.row(i), yt.row(j));
        if squared {
            d2
        } else {
            d2.sqrt()
        }
    })
}
