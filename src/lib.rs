//! # fmralign: functional alignment of fMRI signals for Rust
//!
//! Learns maps between the voxel spaces of different subjects who were
//! exposed to the same stimuli, so that their activation profiles can be
//! compared, pooled or predicted from one another.
//!
//! ## What is functional alignment?
//!
//! Anatomical registration puts brains in a common coordinate system, but
//! the same voxel does not carry the same function in every subject.
//! Functional alignment instead uses the responses themselves: given
//! `n_samples x n_voxels` signals `X` (source) and `Y` (target) recorded on
//! identical stimuli, it fits a transform `R` with `X R ≈ Y`.
//!
//! **Available transforms:**
//! - Scaled orthogonal Procrustes (default): rotation plus a global scale
//! - Ridge regression with cross-validated penalty
//! - Optimal permutation (Hungarian algorithm)
//! - Entropic optimal transport (Sinkhorn)
//! - Identity (baseline)
//!
//! **Piecewise alignment:** voxels are grouped into parcels (explicit labels
//! or k-means on voxel profiles) and one transform is fitted per parcel.
//! Several bootstrap parcellations can be bagged to smooth parcel borders.
//!
//! ## Quick Start
//!
//! ### Pairwise alignment
//!
//! ```rust
//! use fmralign::prelude::*;
//!
//! // 6 samples x 3 voxels
//! let source: Matrix<f64> = Matrix::from_rows(&[
//!     vec![1.0, 0.0, 2.0],
//!     vec![0.0, 1.0, 1.0],
//!     vec![2.0, 1.0, 0.0],
//!     vec![1.0, 3.0, 1.0],
//!     vec![0.5, 0.0, 1.5],
//!     vec![2.0, 2.0, 1.0],
//! ])?;
//!
//! // The target swaps the first two voxels.
//! let target = Matrix::from_fn(6, 3, |i, j| source[(i, [1, 0, 2][j])]);
//!
//! let model = Aligner::new()
//!     .method(ScaledOrthogonal)
//!     .adapter(Pairwise)
//!     .build()?;
//!
//! let fitted = model.fit(&source, &target)?;
//! let aligned = fitted.transform(&source)?;
//!
//! for i in 0..6 {
//!     for j in 0..3 {
//!         assert!((aligned[(i, j)] - target[(i, j)]).abs() < 1e-8);
//!     }
//! }
//! println!("{}", fitted);
//! # Result::<(), AlignError>::Ok(())
//! ```
//!
//! ```text
//! Pairwise alignment
//!   Method:  scaled_orthogonal
//!   Voxels:  3
//!   Pieces:  1
//!   Bags:    1
//! ```
//!
//! ### Piecewise ridge alignment
//!
//! ```rust
//! use fmralign::prelude::*;
//!
//! let source = Matrix::from_fn(8, 4, |i, j| ((i * 7 + j * 3) % 5) as f64 + 0.1 * j as f64);
//! let target = Matrix::from_fn(8, 4, |i, j| 2.0 * source[(i, j)] + 1.0);
//!
//! let alphas = [0.01, 1.0, 100.0];
//! let model = Aligner::new()
//!     .method(Ridge)
//!     .cross_validate(KFold(4, &alphas).seed(7))
//!     .parcellation(Labels(vec![0, 0, 1, 1]))
//!     .adapter(Pairwise)
//!     .build()?;
//!
//! let fitted = model.fit(&source, &target)?;
//! assert_eq!(fitted.n_pieces(), 2);
//! assert_eq!(fitted.ridge_alphas().len(), 2);
//!
//! let score = Score::R2.mean(&target, &fitted.transform(&source)?)?;
//! assert!(score > 0.5);
//! # Result::<(), AlignError>::Ok(())
//! ```
//!
//! ### Template alignment
//!
//! ```rust
//! use fmralign::prelude::*;
//!
//! let subject: Matrix<f64> = Matrix::from_rows(&[
//!     vec![1.0, 0.0, 2.0],
//!     vec![0.0, 1.0, 1.0],
//!     vec![2.0, 1.0, 0.0],
//!     vec![1.0, 3.0, 1.0],
//! ])?;
//! let subjects = vec![subject.clone(), subject.clone(), subject.clone()];
//!
//! let model = Aligner::new()
//!     .n_iter(2)
//!     .adapter(Template)
//!     .build()?;
//!
//! let fitted = model.fit(&subjects)?;
//! assert_eq!(fitted.n_subjects(), 3);
//!
//! let template = fitted.template();
//! for i in 0..4 {
//!     for j in 0..3 {
//!         assert!((template[(i, j)] - subject[(i, j)]).abs() < 1e-8);
//!     }
//! }
//! # Result::<(), AlignError>::Ok(())
//! ```
//!
//! ## Configuration errors
//!
//! Parameters are validated when `.build()` is called. Setting a parameter
//! twice, or a parameter the adapter does not use, is reported there:
//!
//! ```rust
//! use fmralign::prelude::*;
//!
//! let err = Aligner::<f64>::new()
//!     .n_bags(2)
//!     .n_bags(3)
//!     .adapter(Pairwise)
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, AlignError::DuplicateParameter { parameter: "n_bags" }));
//!
//! let err = Aligner::<f64>::new()
//!     .n_iter(3)
//!     .adapter(Pairwise)
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, AlignError::UnsupportedFeature { .. }));
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): fit and apply parcels on the rayon thread pool.
//! - `dev`: expose internal modules for testing.
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: fit
//! summaries at `debug`, per-iteration solver progress at `trace`, and
//! non-convergence or ignored settings at `warn`. Install any subscriber to
//! see them.

#![deny(missing_docs)]

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains the error type, the row-major `Matrix` and a seeded PRNG.
mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains the linear algebra backend, pairwise distances, the Hungarian
// solver, Sinkhorn iterations and k-means.
mod math;

// Layer 3: Algorithms - alignment methods.
//
// Contains Procrustes, ridge, permutation and optimal-transport fits, and
// the fitted transform type.
mod algorithms;

// Layer 4: Evaluation - model selection and scores.
//
// Contains cross-validation for the ridge penalty and voxelwise scores.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains validation, parcellation and the piecewise executor.
mod engine;

// Layer 6: Adapters - execution mode adapters.
//
// Contains pairwise and template alignment.
mod adapters;

// High-level fluent API.
//
// Provides the `Aligner` builder for configuring and running alignments.
mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard fmralign prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use fmralign::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        Adapter::{Pairwise, Template},
        AlignError, AlignerBuilder as Aligner,
        AlignmentMethod::{Hungarian, Identity, OptimalTransport, Ridge, ScaledOrthogonal},
        FittedPairwise, FittedTemplate, KFold, Matrix,
        Parcellation::{KMeans, Labels},
        Score, LOOCV,
    };
}

pub use api::*;

// ============================================================================
// Testing re-exports
// ============================================================================

/// Internal modules for development and testing.
///
/// This module re-exports internal modules for development and testing purposes.
/// It is only available with the `dev` feature enabled.
///
/// **Warning**: These are internal implementation details and may change without notice.
/// Do not use in production code.
#[cfg(feature = "dev")]
pub mod internals {
    /// Internal primitive types and utilities.
    pub mod primitives {
        pub use crate::primitives::*;
    }
    /// Internal math functions.
    pub mod math {
        pub use crate::math::*;
    }
    /// Internal alignment algorithms.
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    /// Internal execution engine.
    pub mod engine {
        pub use crate::engine::*;
    }
    /// Internal evaluation.
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    /// Internal adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }
    /// Internal API.
    pub mod api {
        pub use crate::api::*;
    }
}
