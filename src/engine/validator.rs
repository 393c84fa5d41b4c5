//! Input validation for alignment configuration and data.
//!
//! ## Purpose
//!
//! This module provides validation functions for alignment configuration
//! parameters and input signals. It checks requirements such as matching
//! shapes, finite values, and parameter bounds.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Efficiency**: Checks are ordered from cheap to expensive.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Parameter Bounds**: Enforces constraints like `alpha > 0` or `k >= 2`.
//! * **Finite Checks**: Ensures all inputs are finite (no NaN/Inf).
//! * **Shape Checks**: Source and target must share samples and voxels.
//!
//! ## Invariants
//!
//! * All validated inputs satisfy their respective mathematical constraints.
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not transform, impute or filter input data.
//! * This module does not provide automatic correction of invalid inputs.

use num_traits::Float;

use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for alignment configuration and input data.
///
/// Provides static methods for validating parameters and signals. All
/// methods return `Result<(), AlignError>` and fail fast upon identifying
/// the first violation.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Core Input Validation
    // ========================================================================

    /// Validate a single signal matrix.
    pub fn validate_matrix<T: Float>(m: &Matrix<T>, name: &str) -> Result<(), AlignError> {
        // Check 1: Non-empty
        if m.rows() == 0 || m.cols() == 0 {
            return Err(AlignError::EmptyInput);
        }

        // Check 2: All values finite
        if let Some(pos) = m.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(AlignError::InvalidNumericValue(format!(
                "{}[{}, {}]={}",
                name,
                pos / m.cols(),
                pos % m.cols(),
                m.as_slice()[pos].to_f64().unwrap_or(f64::NAN)
            )));
        }

        Ok(())
    }

    /// Validate a source/target pair.
    pub fn validate_pair<T: Float>(x: &Matrix<T>, y: &Matrix<T>) -> Result<(), AlignError> {
        if x.is_empty() || y.is_empty() {
            return Err(AlignError::EmptyInput);
        }
        if x.shape() != y.shape() {
            return Err(AlignError::ShapeMismatch {
                expected: x.shape(),
                got: y.shape(),
            });
        }
        Self::validate_matrix(x, "source")?;
        Self::validate_matrix(y, "target")
    }

    /// Validate data to transform against the fitted voxel count.
    pub fn validate_transform_input<T: Float>(
        x: &Matrix<T>,
        n_voxels: usize,
    ) -> Result<(), AlignError> {
        if x.is_empty() {
            return Err(AlignError::EmptyInput);
        }
        if x.cols() != n_voxels {
            return Err(AlignError::ShapeMismatch {
                expected: (x.rows(), n_voxels),
                got: x.shape(),
            });
        }
        Self::validate_matrix(x, "input")
    }

    /// Validate the subjects of a template alignment.
    pub fn validate_subjects<T: Float>(subjects: &[Matrix<T>]) -> Result<(), AlignError> {
        if subjects.len() < 2 {
            return Err(AlignError::InvalidInput(format!(
                "template alignment needs at least 2 subjects, got {}",
                subjects.len()
            )));
        }
        let shape = subjects[0].shape();
        for (i, s) in subjects.iter().enumerate() {
            if s.shape() != shape {
                return Err(AlignError::ShapeMismatch {
                    expected: shape,
                    got: s.shape(),
                });
            }
            Self::validate_matrix(s, &format!("subject{}", i))?;
        }
        Ok(())
    }

    // ========================================================================
    // Parameter Validation
    // ========================================================================

    /// Validate candidate ridge penalties.
    pub fn validate_alphas<T: Float>(alphas: &[T]) -> Result<(), AlignError> {
        if alphas.is_empty() {
            return Err(AlignError::InvalidInput(
                "at least one alpha is required".to_string(),
            ));
        }
        for &a in alphas {
            if !a.is_finite() || a <= T::zero() {
                return Err(AlignError::InvalidAlpha(a.to_f64().unwrap_or(f64::NAN)));
            }
        }
        Ok(())
    }

    /// Validate entropic regularization.
    pub fn validate_regularization<T: Float>(reg: T) -> Result<(), AlignError> {
        if !reg.is_finite() || reg <= T::zero() {
            return Err(AlignError::InvalidRegularization(
                reg.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate convergence tolerance.
    pub fn validate_tolerance<T: Float>(tol: T) -> Result<(), AlignError> {
        if !tol.is_finite() || tol <= T::zero() {
            return Err(AlignError::InvalidTolerance(tol.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// Validate an iteration count.
    pub fn validate_iterations(n: usize) -> Result<(), AlignError> {
        if n == 0 {
            return Err(AlignError::InvalidIterations(n));
        }
        Ok(())
    }

    /// Validate the number of folds.
    pub fn validate_kfold(k: usize) -> Result<(), AlignError> {
        if k < 2 {
            return Err(AlignError::InvalidFolds(k));
        }
        Ok(())
    }

    /// Validate the number of bags.
    pub fn validate_bags(n_bags: usize) -> Result<(), AlignError> {
        if n_bags == 0 {
            return Err(AlignError::InvalidBags(n_bags));
        }
        Ok(())
    }

    /// Validate the number of parcels against the voxel count.
    pub fn validate_pieces(n_pieces: usize, n_voxels: usize) -> Result<(), AlignError> {
        if n_pieces == 0 || n_pieces > n_voxels {
            return Err(AlignError::InvalidPieces { n_pieces, n_voxels });
        }
        Ok(())
    }

    /// Validate explicit parcel labels.
    pub fn validate_labels(labels: &[usize], n_voxels: usize) -> Result<(), AlignError> {
        if labels.len() != n_voxels {
            return Err(AlignError::InvalidLabels {
                got: labels.len(),
                expected: n_voxels,
            });
        }
        Ok(())
    }

    /// Validate that no parameter was set multiple times.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), AlignError> {
        if let Some(param) = duplicate_param {
            return Err(AlignError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
