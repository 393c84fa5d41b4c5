//! Linear algebra backend abstraction for alignment.
//!
//! ## Purpose
//!
//! This module provides a trait-based abstraction over the dense linear
//! algebra used by the alignment methods, standardizing on the nalgebra
//! backend.
//!
//! ## Design notes
//!
//! * All buffers crossing the trait boundary are row-major.
//! * Thin SVD for Procrustes, Cholesky for ridge normal equations.
//! * Fallback to LU when a ridge system is not numerically positive definite.
//! * Generic over `FloatLinalg` types (f32 and f64) which delegate to nalgebra.

use core::fmt::Debug;
use num_traits::Float;

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Thin singular value decomposition `A = U diag(s) Vᵀ`, row-major.
#[derive(Debug, Clone)]
pub struct ThinSvd<T> {
    /// Left singular vectors, `m x r`.
    pub u: Vec<T>,
    /// Singular values, length `r`.
    pub s: Vec<T>,
    /// Right singular vectors transposed, `r x n`.
    pub vt: Vec<T>,
    /// `r = min(m, n)`.
    pub rank: usize,
}

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + Debug + Send + Sync + 'static {
    /// Row-major product of an `m x k` and a `k x n` matrix.
    fn gemm(a: &[Self], b: &[Self], m: usize, k: usize, n: usize) -> Vec<Self>;
    /// Thin SVD of an `m x n` matrix.
    fn thin_svd(a: &[Self], m: usize, n: usize) -> Option<ThinSvd<Self>>;
    /// Solve `A X = B` for symmetric positive (semi-)definite `A` (`n x n`), `B` is `n x n_rhs`.
    fn solve_spd(a: &[Self], b: &[Self], n: usize, n_rhs: usize) -> Option<Vec<Self>>;
}

macro_rules! impl_float_linalg {
    ($t:ty) => {
        impl FloatLinalg for $t {
            #[inline]
            fn gemm(a: &[Self], b: &[Self], m: usize, k: usize, n: usize) -> Vec<Self> {
                nalgebra_backend::gemm(a, b, m, k, n)
            }
            #[inline]
            fn thin_svd(a: &[Self], m: usize, n: usize) -> Option<ThinSvd<Self>> {
                nalgebra_backend::thin_svd(a, m, n)
            }
            #[inline]
            fn solve_spd(a: &[Self], b: &[Self], n: usize, n_rhs: usize) -> Option<Vec<Self>> {
                nalgebra_backend::solve_spd(a, b, n, n_rhs)
            }
        }
    };
}

impl_float_linalg!(f64);
impl_float_linalg!(f32);

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::ThinSvd;
    use nalgebra::{DMatrix, RealField};

    /// Column-major nalgebra storage back to a row-major buffer.
    fn to_row_major<T: RealField + Copy>(m: &DMatrix<T>) -> Vec<T> {
        m.transpose().as_slice().to_vec()
    }

    /// Row-major matrix product.
    pub fn gemm<T: RealField + Copy>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Vec<T> {
        let lhs = DMatrix::from_row_slice(m, k, a);
        let rhs = DMatrix::from_row_slice(k, n, b);
        to_row_major(&(lhs * rhs))
    }

    /// Thin SVD of a row-major `m x n` matrix.
    pub fn thin_svd<T: RealField + Copy>(a: &[T], m: usize, n: usize) -> Option<ThinSvd<T>> {
        let matrix = DMatrix::from_row_slice(m, n, a);
        let svd = matrix.try_svd(true, true, T::default_epsilon(), 0)?;
        let u = svd.u?;
        let vt = svd.v_t?;
        let s = svd.singular_values.as_slice().to_vec();
        Some(ThinSvd {
            rank: s.len(),
            u: to_row_major(&u),
            s,
            vt: to_row_major(&vt),
        })
    }

    /// Solve `A X = B` with Cholesky, falling back to LU.
    pub fn solve_spd<T: RealField + Copy>(
        a: &[T],
        b: &[T],
        n: usize,
        n_rhs: usize,
    ) -> Option<Vec<T>> {
        let matrix = DMatrix::from_row_slice(n, n, a);
        let rhs = DMatrix::from_row_slice(n, n_rhs, b);

        if let Some(chol) = matrix.clone().cholesky() {
            return Some(to_row_major(&chol.solve(&rhs)));
        }

        matrix.lu().solve(&rhs).map(|x| to_row_major(&x))
    }
}
