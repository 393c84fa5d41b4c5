//! Error types for functional alignment.
//!
//! ## Purpose
//!
//! This module defines [`AlignError`], the single error type returned by every
//! fallible operation in the crate: input validation, parameter validation,
//! numerical decompositions and adapter configuration.
//!
//! ## Design notes
//!
//! * **Flat**: One enum, no nested sources, so errors are `Clone` and `PartialEq`.
//! * **Descriptive**: Messages carry the offending value and the accepted range.

use core::fmt;

/// Error type for alignment configuration, validation and fitting.
#[derive(Debug, Clone, PartialEq)]
pub enum AlignError {
    /// Input matrices contain no samples or no voxels.
    EmptyInput,

    /// Generic invalid input.
    InvalidInput(String),

    /// Matrix shape does not match the expected shape.
    ShapeMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },

    /// A value is NaN or infinite.
    InvalidNumericValue(String),

    /// Not enough samples for the requested operation.
    TooFewSamples {
        /// Number of samples provided.
        got: usize,
        /// Minimum number of samples required.
        min: usize,
    },

    /// Ridge penalty is not strictly positive.
    InvalidAlpha(f64),

    /// Entropic regularization is not strictly positive.
    InvalidRegularization(f64),

    /// Convergence tolerance is not strictly positive.
    InvalidTolerance(f64),

    /// Iteration count is zero.
    InvalidIterations(usize),

    /// K-fold cross-validation with fewer than two folds.
    InvalidFolds(usize),

    /// Number of parcels outside `1..=n_voxels`.
    InvalidPieces {
        /// Requested number of parcels.
        n_pieces: usize,
        /// Number of voxels available.
        n_voxels: usize,
    },

    /// Number of bags is zero.
    InvalidBags(usize),

    /// Parcellation labels do not cover the voxels.
    InvalidLabels {
        /// Number of labels provided.
        got: usize,
        /// Number of voxels.
        expected: usize,
    },

    /// Subject index passed to a template model is out of range.
    SubjectOutOfRange {
        /// Requested subject index.
        index: usize,
        /// Number of fitted subjects.
        n_subjects: usize,
    },

    /// A matrix decomposition or linear solve failed.
    DecompositionFailed(&'static str),

    /// Feature not supported by the selected adapter.
    UnsupportedFeature {
        /// Adapter name.
        adapter: &'static str,
        /// Feature name.
        feature: &'static str,
    },

    /// A builder parameter was configured more than once.
    DuplicateParameter {
        /// Parameter name.
        parameter: &'static str,
    },
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::EmptyInput => write!(f, "Input matrices are empty"),
            AlignError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AlignError::ShapeMismatch { expected, got } => write!(
                f,
                "Shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, got.0, got.1
            ),
            AlignError::InvalidNumericValue(msg) => write!(f, "Invalid numeric value: {}", msg),
            AlignError::TooFewSamples { got, min } => write!(
                f,
                "Too few samples: got {}, need at least {}",
                got, min
            ),
            AlignError::InvalidAlpha(alpha) => {
                write!(f, "Invalid alpha: {} (must be > 0 and finite)", alpha)
            }
            AlignError::InvalidRegularization(reg) => {
                write!(f, "Invalid regularization: {} (must be > 0 and finite)", reg)
            }
            AlignError::InvalidTolerance(tol) => {
                write!(f, "Invalid tolerance: {} (must be > 0 and finite)", tol)
            }
            AlignError::InvalidIterations(n) => {
                write!(f, "Invalid iterations: {} (must be at least 1)", n)
            }
            AlignError::InvalidFolds(k) => {
                write!(f, "Invalid number of folds: {} (must be at least 2)", k)
            }
            AlignError::InvalidPieces { n_pieces, n_voxels } => write!(
                f,
                "Invalid n_pieces: {} (must be between 1 and n_voxels {})",
                n_pieces, n_voxels
            ),
            AlignError::InvalidBags(n) => write!(f, "Invalid n_bags: {} (must be at least 1)", n),
            AlignError::InvalidLabels { got, expected } => write!(
                f,
                "Invalid labels: got {} labels for {} voxels",
                got, expected
            ),
            AlignError::SubjectOutOfRange { index, n_subjects } => write!(
                f,
                "Subject index {} out of range ({} subjects)",
                index, n_subjects
            ),
            AlignError::DecompositionFailed(what) => write!(f, "Decomposition failed: {}", what),
            AlignError::UnsupportedFeature { adapter, feature } => write!(
                f,
                "Adapter '{}' does not support feature: {}",
                adapter, feature
            ),
            AlignError::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{}' was set multiple times. Each parameter can only be configured once.",
                parameter
            ),
        }
    }
}

impl std::error::Error for AlignError {}
