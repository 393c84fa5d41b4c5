//! Layer 3: Algorithms
//!
//! # Purpose
//!
//! This layer implements the per-parcel alignment methods:
//! - Scaled orthogonal Procrustes
//! - Ridge regression with cross-validated penalty
//! - Optimal permutation (Hungarian)
//! - Entropic optimal transport
//!
//! and the [`method`] glue that fits them and applies fitted transforms.
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Scaled orthogonal Procrustes.
pub mod procrustes;

/// Ridge regression.
pub mod ridge;

/// Optimal permutation.
pub mod permutation;

/// Optimal transport.
pub mod transport;

/// Method selection and fitted transforms.
pub mod method;
