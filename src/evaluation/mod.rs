//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer provides model selection and quality measures:
//! - Cross-validation for the ridge penalty
//! - Voxelwise scores (R², zero-mean R², correlation)
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
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Cross-validation.
pub mod cv;

/// Voxelwise scores.
pub mod scoring;
