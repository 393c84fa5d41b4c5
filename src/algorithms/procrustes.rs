//! Scaled orthogonal Procrustes alignment.
//!
//! ## Purpose
//!
//! Finds an orthogonal matrix `R` and a scalar `sc` minimizing the
//! Frobenius norm `||sc X R - Y||²`, where `X` and `Y` are
//! `n_samples x n_voxels` source and target signals.
//!
//! ## Design notes
//!
//! * **Primal**: SVD of the `p x p` cross-covariance `XᵀY + 1e-18 I = U S Vᵀ`,
//!   `R = U Vᵀ`.
//! * **Dual**: When samples are fewer than voxels, works with thin SVDs of `X`
//!   and `Y` so the SVD at the core is only `n x n`.
//! * **Scaling**: `sc = trace(S) / ||X||²`, the least-squares optimal scale
//!   for the chosen `R`.
//!
//! ## Invariants
//!
//! * If either input has zero norm, the solution is `(I, 1)`.
//! * Primal and dual formulations give the same `R` up to numerical noise
//!   whenever `XᵀY` has full rank.

use num_traits::Float;

use crate::math::linalg::{FloatLinalg, ThinSvd};
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Orthogonal transform and scale fitted by [`scaled_procrustes`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcrustesSolution<T> {
    /// `p x p` mixing matrix, applied as `X R`.
    pub rotation: Matrix<T>,
    /// Scalar applied on top of the rotation.
    pub scale: T,
}

/// Compute `R`, `sc` minimizing `||sc X R - Y||²` with `R` orthogonal.
///
/// `primal` selects the formulation; `None` uses the primal one iff
/// `n_samples >= n_voxels`. When `scaling` is false `sc` is 1.
pub fn scaled_procrustes<T: FloatLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
    scaling: bool,
    primal: Option<bool>,
) -> Result<ProcrustesSolution<T>, AlignError> {
    if x.shape() != y.shape() {
        return Err(AlignError::ShapeMismatch {
            expected: x.shape(),
            got: y.shape(),
        });
    }

    let (n, p) = x.shape();
    let x_norm = x.frobenius_norm();
    if x_norm == T::zero() || y.frobenius_norm() == T::zero() {
        return Ok(ProcrustesSolution {
            rotation: Matrix::identity(p),
            scale: T::one(),
        });
    }

    let primal = primal.unwrap_or(n >= p);
    let (rotation, singular_sum) = if primal {
        primal_rotation(x, y)?
    } else {
        dual_rotation(x, y)?
    };

    let scale = if scaling {
        singular_sum / (x_norm * x_norm)
    } else {
        T::one()
    };

    Ok(ProcrustesSolution { rotation, scale })
}

/// `R = U Vᵀ` from the SVD of `XᵀY`.
fn primal_rotation<T: FloatLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
) -> Result<(Matrix<T>, T), AlignError> {
    let p = x.cols();
    let mut cross = x.transpose().matmul(y);
    // Tiny ridge on the diagonal keeps the SVD well posed for singular `XᵀY`.
    cross.add_diagonal(T::from(1e-18).unwrap());
    let svd = T::thin_svd(cross.as_slice(), p, p)
        .ok_or(AlignError::DecompositionFailed("SVD of cross-covariance"))?;

    let u = Matrix::new(p, svd.rank, svd.u)?;
    let vt = Matrix::new(svd.rank, p, svd.vt)?;
    Ok((u.matmul(&vt), sum(&svd.s)))
}

/// `R = Vₓ U Vᵀ V_yᵀ` where `U S Vᵀ` is the SVD of `Sₓ Uₓᵀ U_y S_y`.
fn dual_rotation<T: FloatLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
) -> Result<(Matrix<T>, T), AlignError> {
    let (n, p) = x.shape();
    let svd_x = T::thin_svd(x.as_slice(), n, p)
        .ok_or(AlignError::DecompositionFailed("SVD of source signals"))?;
    let svd_y = T::thin_svd(y.as_slice(), n, p)
        .ok_or(AlignError::DecompositionFailed("SVD of target signals"))?;

    let (ux, sx, vxt) = factors(svd_x, n, p)?;
    let (uy, sy, vyt) = factors(svd_y, n, p)?;

    // Sₓ Uₓᵀ U_y S_y
    let mut core = ux.transpose().matmul(&uy);
    for i in 0..core.rows() {
        for j in 0..core.cols() {
            core[(i, j)] = sx[i] * core[(i, j)] * sy[j];
        }
    }

    let (rx, ry) = core.shape();
    let svd = T::thin_svd(core.as_slice(), rx, ry)
        .ok_or(AlignError::DecompositionFailed("SVD of dual core"))?;
    let singular_sum = sum(&svd.s);
    let u = Matrix::new(rx, svd.rank, svd.u)?;
    let vt = Matrix::new(svd.rank, ry, svd.vt)?;

    let rotation = vxt.transpose().matmul(&u).matmul(&vt).matmul(&vyt);
    Ok((rotation, singular_sum))
}

type Factors<T> = (Matrix<T>, Vec<T>, Matrix<T>);

fn factors<T: FloatLinalg>(svd: ThinSvd<T>, m: usize, n: usize) -> Result<Factors<T>, AlignError> {
    let u = Matrix::new(m, svd.rank, svd.u)?;
    let vt = Matrix::new(svd.rank, n, svd.vt)?;
    Ok((u, svd.s, vt))
}

fn sum<T: Float>(values: &[T]) -> T {
    values.iter().fold(T::zero(), |acc, &v| acc + v)
}
