//! Parcellation of voxels into independently aligned pieces.
//!
//! ## Purpose
//!
//! Piecewise alignment fits one transform per parcel. This module turns a
//! [`Parcellation`] request (explicit labels or a k-means clustering of the
//! source voxel profiles) into contiguous labels and per-piece voxel lists.
//!
//! ## Design notes
//!
//! * **Relabelling**: Arbitrary label values are mapped to `0..n_pieces` in
//!   increasing order of the original values.
//! * **Clustering**: Each voxel is a point whose coordinates are its samples.
//!
//! ## Invariants
//!
//! * Every voxel belongs to exactly one piece and no piece is empty.
//! * Voxel lists are sorted in increasing voxel order.

use tracing::debug;

use crate::engine::validator::Validator;
use crate::math::distance::DistanceLinalg;
use crate::math::kmeans::kmeans;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;

/// Default k-means iteration cap.
pub const DEFAULT_KMEANS_ITER: usize = 100;

/// How voxels are grouped into pieces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parcellation {
    /// One label per voxel.
    Labels(Vec<usize>),

    /// K-means on source voxel profiles with this many pieces.
    KMeans(usize),
}

impl Default for Parcellation {
    fn default() -> Self {
        Parcellation::KMeans(1)
    }
}

impl Parcellation {
    /// True when repeated resolutions can differ (bagging makes sense).
    pub fn is_stochastic(&self) -> bool {
        matches!(self, Parcellation::KMeans(k) if *k > 1)
    }

    /// Compute contiguous labels for the voxels of `x`.
    pub fn resolve<T: DistanceLinalg>(
        &self,
        x: &Matrix<T>,
        seed: u64,
        max_iter: usize,
    ) -> Result<Vec<usize>, AlignError> {
        let n_voxels = x.cols();
        match self {
            Parcellation::Labels(labels) => {
                Validator::validate_labels(labels, n_voxels)?;
                Ok(relabel(labels))
            }
            Parcellation::KMeans(n_pieces) => {
                Validator::validate_pieces(*n_pieces, n_voxels)?;
                if *n_pieces == 1 {
                    return Ok(vec![0; n_voxels]);
                }
                let result = kmeans(&x.transpose(), *n_pieces, max_iter, seed);
                debug!(
                    n_pieces,
                    iterations = result.iterations,
                    "k-means parcellation done"
                );
                Ok(relabel(&result.labels))
            }
        }
    }
}

/// Map arbitrary labels to `0..n_unique`, preserving their order.
pub fn relabel(labels: &[usize]) -> Vec<usize> {
    let mut unique: Vec<usize> = labels.to_vec();
    unique.sort_unstable();
    unique.dedup();
    labels
        .iter()
        .map(|l| unique.binary_search(l).unwrap_or(0))
        .collect()
}

/// Voxel indices of each piece for contiguous labels.
pub fn pieces(labels: &[usize]) -> Vec<Vec<usize>> {
    let n_pieces = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut out = vec![Vec::new(); n_pieces];
    for (voxel, &label) in labels.iter().enumerate() {
        out[label].push(voxel);
    }
    out.retain(|p| !p.is_empty());
    out
}
