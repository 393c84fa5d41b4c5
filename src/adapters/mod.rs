//! Layer 6: Adapters
//!
//! # Purpose
//!
//! This layer provides the execution adapters exposed through the API:
//! - Pairwise: map one subject onto another
//! - Template: build a common space from many subjects
//!
//! # Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Source-to-target alignment.
pub mod pairwise;

/// Group template alignment.
pub mod template;
