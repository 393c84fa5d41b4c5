//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates piecewise alignment:
//! - Input and parameter validation
//! - Parcellation of voxels into pieces
//! - Per-piece fitting and transformation, optionally in parallel
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Piecewise execution.
pub mod executor;

/// Voxel parcellation.
pub mod parcellation;

/// Validation.
pub mod validator;
