//! Voxelwise alignment scores.
//!
//! ## Purpose
//!
//! Compares predicted signals with ground truth voxel by voxel, the usual
//! way of judging how well a source subject was mapped onto a target.
//!
//! ## Key concepts
//!
//! * **R2**: `1 - SS_res / SS_tot`, with `SS_tot` around the column mean.
//! * **ZeroMeanR2**: Same, with `SS_tot` around zero.
//! * **Correlation**: Pearson correlation of each column pair.
//!
//! ## Invariants
//!
//! * Constant truth columns never produce NaN: a perfect prediction scores 1,
//!   anything else scores 0.

use num_traits::Float;

use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Voxelwise score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Score {
    /// Coefficient of determination.
    #[default]
    R2,
    /// Coefficient of determination against a zero baseline.
    ZeroMeanR2,
    /// Pearson correlation.
    Correlation,
}

impl Score {
    /// Score each voxel (column) of `predicted` against `truth`.
    pub fn voxelwise<T: Float>(
        self,
        truth: &Matrix<T>,
        predicted: &Matrix<T>,
    ) -> Result<Vec<T>, AlignError> {
        if truth.shape() != predicted.shape() {
            return Err(AlignError::ShapeMismatch {
                expected: truth.shape(),
                got: predicted.shape(),
            });
        }
        if truth.is_empty() {
            return Err(AlignError::EmptyInput);
        }

        Ok((0..truth.cols())
            .map(|j| {
                let t = truth.column(j);
                let p = predicted.column(j);
                match self {
                    Score::R2 => r2(&t, &p, true),
                    Score::ZeroMeanR2 => r2(&t, &p, false),
                    Score::Correlation => pearson(&t, &p),
                }
            })
            .collect())
    }

    /// Mean voxelwise score.
    pub fn mean<T: Float>(self, truth: &Matrix<T>, predicted: &Matrix<T>) -> Result<T, AlignError> {
        let scores = self.voxelwise(truth, predicted)?;
        let total = scores.iter().fold(T::zero(), |acc, &s| acc + s);
        Ok(total / T::from(scores.len()).unwrap())
    }
}

fn mean<T: Float>(v: &[T]) -> T {
    v.iter().fold(T::zero(), |acc, &x| acc + x) / T::from(v.len()).unwrap()
}

fn r2<T: Float>(truth: &[T], predicted: &[T], centered: bool) -> T {
    let baseline = if centered { mean(truth) } else { T::zero() };
    let (ss_res, ss_tot) = truth
        .iter()
        .zip(predicted)
        .fold((T::zero(), T::zero()), |(res, tot), (&t, &p)| {
            let r = t - p;
            let d = t - baseline;
            (res + r * r, tot + d * d)
        });

    if ss_tot > T::zero() {
        T::one() - ss_res / ss_tot
    } else if ss_res == T::zero() {
        T::one()
    } else {
        T::zero()
    }
}

fn pearson<T: Float>(a: &[T], b: &[T]) -> T {
    let ma = mean(a);
    let mb = mean(b);
    let (cov, va, vb) = a
        .iter()
        .zip(b)
        .fold((T::zero(), T::zero(), T::zero()), |(c, x, y), (&ai, &bi)| {
            let da = ai - ma;
            let db = bi - mb;
            (c + da * db, x + da * da, y + db * db)
        });

    let denom = (va * vb).sqrt();
    if denom > T::zero() {
        cov / denom
    } else if va == T::zero() && vb == T::zero() && a == b {
        T::one()
    } else {
        T::zero()
    }
}
