//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical building blocks used throughout
//! alignment:
//! - Dense linear algebra (SVD, products, SPD solves) via nalgebra
//! - Distances between voxel profiles
//! - Linear sum assignment
//! - Entropic optimal transport (Sinkhorn)
//! - K-means clustering
//!
//! These are reusable mathematical building blocks with no alignment-specific logic.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Linear algebra backend.
pub mod linalg;

/// Pairwise distances between voxel profiles.
pub mod distance;

/// Hungarian algorithm.
pub mod assignment;

/// Log-domain Sinkhorn.
pub mod sinkhorn;

/// K-means clustering.
pub mod kmeans;
