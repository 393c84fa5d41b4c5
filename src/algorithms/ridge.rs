//! Ridge regression alignment with built-in cross-validation.
//!
//! ## Purpose
//!
//! Fits a linear map `W` (and intercept `b`) minimizing
//! `||X W + b - Y||² + alpha ||W||²`, selecting `alpha` among candidates by
//! cross-validation before refitting on all samples.
//!
//! ## Design notes
//!
//! * **Intercept**: Handled by centering `X` and `Y`; `b = mean(Y) - mean(X) W`.
//! * **Primal/Dual**: Solves the `p x p` normal equations when samples are at
//!   least as many as voxels, otherwise the `n x n` kernel system
//!   `W = Xᵀ (X Xᵀ + alpha I)⁻¹ Y`.
//! * **Selection**: K-fold keeps the highest held-out R² averaged over
//!   voxels, then folds. Leave-one-out keeps the lowest held-out MSE.
//!
//! ## Invariants
//!
//! * `alpha > 0`, so both systems are positive definite.
//!
//! ## Non-goals
//!
//! * This module does not support per-target penalties.

use num_traits::Float;

use crate::evaluation::cv::CVKind;
use crate::evaluation::scoring::Score;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Default candidate penalties.
pub const DEFAULT_ALPHAS: [f64; 5] = [0.1, 1.0, 10.0, 100.0, 1000.0];

/// Fitted ridge map.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeSolution<T> {
    /// `p x q` coefficient matrix.
    pub coef: Matrix<T>,
    /// Length-`q` intercept.
    pub intercept: Vec<T>,
    /// Penalty used for the fit.
    pub alpha: T,
}

impl<T: FloatLinalg> RidgeSolution<T> {
    /// Predict `X W + b`.
    pub fn predict(&self, x: &Matrix<T>) -> Matrix<T> {
        let mut out = x.matmul(&self.coef);
        out.add_to_columns(&self.intercept);
        out
    }
}

/// Fit ridge regression with a fixed penalty.
pub fn fit_ridge<T: FloatLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
    alpha: T,
    fit_intercept: bool,
) -> Result<RidgeSolution<T>, AlignError> {
    if x.rows() != y.rows() {
        return Err(AlignError::ShapeMismatch {
            expected: (x.rows(), y.cols()),
            got: y.shape(),
        });
    }
    let (n, p) = x.shape();
    let q = y.cols();

    let mut xc = x.clone();
    let mut yc = y.clone();
    let (x_mean, y_mean) = if fit_intercept {
        let xm = x.column_means();
        let ym = y.column_means();
        xc.center_columns(&xm);
        yc.center_columns(&ym);
        (xm, ym)
    } else {
        (vec![T::zero(); p], vec![T::zero(); q])
    };

    let xct = xc.transpose();
    let coef = if n >= p {
        let mut gram = xct.matmul(&xc);
        gram.add_diagonal(alpha);
        let rhs = xct.matmul(&yc);
        let solved = T::solve_spd(gram.as_slice(), rhs.as_slice(), p, q)
            .ok_or(AlignError::DecompositionFailed("ridge normal equations"))?;
        Matrix::new(p, q, solved)?
    } else {
        let mut kernel = xc.matmul(&xct);
        kernel.add_diagonal(alpha);
        let solved = T::solve_spd(kernel.as_slice(), yc.as_slice(), n, q)
            .ok_or(AlignError::DecompositionFailed("ridge kernel system"))?;
        xct.matmul(&Matrix::new(n, q, solved)?)
    };

    // b = mean(Y) - mean(X) W
    let mean_row = Matrix::new(1, p, x_mean)?;
    let offset = mean_row.matmul(&coef);
    let intercept = y_mean
        .iter()
        .zip(offset.as_slice())
        .map(|(&ym, &o)| ym - o)
        .collect();

    Ok(RidgeSolution {
        coef,
        intercept,
        alpha,
    })
}

/// Select `alpha` by cross-validation, then refit on all samples.
///
/// Returns the final fit and the cross-validation score of each candidate
/// (lower is better): negated held-out R² for K-fold, held-out MSE for
/// leave-one-out.
pub fn ridge_cv<T: FloatLinalg>(
    x: &Matrix<T>,
    y: &Matrix<T>,
    alphas: &[T],
    cv: CVKind,
    seed: Option<u64>,
    fit_intercept: bool,
) -> Result<(RidgeSolution<T>, Vec<T>), AlignError> {
    if alphas.len() == 1 {
        return Ok((fit_ridge(x, y, alphas[0], fit_intercept)?, Vec::new()));
    }

    let (best, scores) = cv.run(x.rows(), alphas, seed, |train, test, alpha| {
        let model = fit_ridge(&x.select_rows(train), &y.select_rows(train), alpha, fit_intercept)?;
        let truth = y.select_rows(test);
        let predicted = model.predict(&x.select_rows(test));
        match cv {
            // R² is undefined on a single held-out sample.
            CVKind::LOOCV => Ok(mean_squared_error(&truth, &predicted)),
            // `run` minimizes.
            CVKind::KFold(_) => Ok(-Score::R2.mean(&truth, &predicted)?),
        }
    })?;

    Ok((fit_ridge(x, y, best, fit_intercept)?, scores))
}

/// Mean squared error over all entries.
pub fn mean_squared_error<T: Float>(truth: &Matrix<T>, predicted: &Matrix<T>) -> T {
    let n = truth.as_slice().len();
    if n == 0 {
        return T::zero();
    }
    let sse = truth
        .as_slice()
        .iter()
        .zip(predicted.as_slice())
        .fold(T::zero(), |acc, (&a, &b)| {
            let d = a - b;
            acc + d * d
        });
    sse / T::from(n).unwrap()
}
