//! Piecewise execution engine.
//!
//! ## Purpose
//!
//! This module runs the piecewise alignment: it resolves the
//! parcellation (once per bag), fits one transform per parcel from the
//! matching source and target columns, and applies the fitted transforms to
//! new data.
//!
//! ## Design notes
//!
//! * **Parallelism**: Parcels are independent; with the `parallel` feature
//!   they are fitted and applied on the rayon pool.
//! * **Bagging**: Each bag clusters a bootstrap resample of the samples;
//!   transforms average the predictions of all bags.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Piece**: Sorted voxel indices plus the transform fitted on them.
//! * **Bag**: One parcellation and its pieces.
//!
//! ## Invariants
//!
//! * Output has the input's shape; every voxel is written by exactly one piece
//!   per bag.
//! * Results do not depend on thread scheduling.
//!
//! ## Non-goals
//!
//! * This module does not validate input data (handled by `validator`).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use num_traits::Float;
use tracing::{debug, warn};

use crate::algorithms::method::{FittedTransform, MethodConfig};
use crate::engine::parcellation::{pieces, Parcellation, DEFAULT_KMEANS_ITER};
use crate::math::distance::DistanceLinalg;
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::AlignError;
use crate::primitives::matrix::Matrix;
use crate::primitives::rng::SimpleRng;

// ============================================================================
// Configuration
// ============================================================================

/// Full configuration of a piecewise alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentConfig<T> {
    /// Per-parcel method and parameters.
    pub method: MethodConfig<T>,
    /// Voxel grouping.
    pub parcellation: Parcellation,
    /// Number of bootstrap parcellations.
    pub n_bags: usize,
    /// Seed for clustering and bootstrap.
    pub seed: u64,
    /// K-means iteration cap.
    pub kmeans_iter: usize,
    /// Fit and apply parcels in parallel.
    pub parallel: bool,
}

impl<T: Float> Default for AlignmentConfig<T> {
    fn default() -> Self {
        Self {
            method: MethodConfig::default(),
            parcellation: Parcellation::default(),
            n_bags: 1,
            seed: 0,
            kmeans_iter: DEFAULT_KMEANS_ITER,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

// ============================================================================
// Fitted State
// ============================================================================

/// Transform fitted on one parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceTransform<T> {
    /// Sorted voxel indices of the parcel.
    pub voxels: Vec<usize>,
    /// Transform fitted on those voxels.
    pub transform: FittedTransform<T>,
}

/// One parcellation and its fitted pieces.
#[derive(Debug, Clone, PartialEq)]
pub struct Bag<T> {
    /// Contiguous label of each voxel.
    pub labels: Vec<usize>,
    /// Fitted pieces.
    pub pieces: Vec<PieceTransform<T>>,
}

// ============================================================================
// Executor
// ============================================================================

/// Piecewise fit/transform driver.
pub struct PiecewiseExecutor;

impl PiecewiseExecutor {
    /// Fit every bag mapping `x` onto `y`.
    pub fn fit<T: FloatLinalg + DistanceLinalg>(
        x: &Matrix<T>,
        y: &Matrix<T>,
        config: &AlignmentConfig<T>,
    ) -> Result<Vec<Bag<T>>, AlignError> {
        let mut n_bags = config.n_bags;
        if n_bags > 1 && !config.parcellation.is_stochastic() {
            warn!(
                n_bags,
                "parcellation is deterministic; collapsing bags into one"
            );
            n_bags = 1;
        }

        debug!(
            method = config.method.method.name(),
            n_bags,
            n_samples = x.rows(),
            n_voxels = x.cols(),
            "fitting piecewise alignment"
        );

        let mut bags = Vec::with_capacity(n_bags);
        for bag in 0..n_bags {
            let bag_seed = config.seed.wrapping_add(bag as u64);
            let labels = if n_bags > 1 {
                let resampled = x.select_rows(&bootstrap_rows(x.rows(), bag_seed));
                config
                    .parcellation
                    .resolve(&resampled, bag_seed, config.kmeans_iter)?
            } else {
                config.parcellation.resolve(x, bag_seed, config.kmeans_iter)?
            };

            let pieces = Self::fit_pieces(x, y, &labels, &config.method, config.parallel)?;
            debug!(bag, n_pieces = pieces.len(), "bag fitted");
            bags.push(Bag { labels, pieces });
        }

        Ok(bags)
    }

    /// Fit one transform per parcel of `labels`.
    pub fn fit_pieces<T: FloatLinalg + DistanceLinalg>(
        x: &Matrix<T>,
        y: &Matrix<T>,
        labels: &[usize],
        method: &MethodConfig<T>,
        parallel: bool,
    ) -> Result<Vec<PieceTransform<T>>, AlignError> {
        let groups = pieces(labels);

        let fit_one = |voxels: Vec<usize>| -> Result<PieceTransform<T>, AlignError> {
            let transform = method.fit(&x.select_columns(&voxels), &y.select_columns(&voxels))?;
            Ok(PieceTransform { voxels, transform })
        };

        #[cfg(feature = "parallel")]
        let fitted = if parallel {
            groups.into_par_iter().map(fit_one).collect()
        } else {
            groups.into_iter().map(fit_one).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let fitted = {
            let _ = parallel;
            groups.into_iter().map(fit_one).collect()
        };

        fitted
    }

    /// Apply fitted pieces to `x`.
    pub fn transform_pieces<T: FloatLinalg>(
        x: &Matrix<T>,
        pieces: &[PieceTransform<T>],
        parallel: bool,
    ) -> Matrix<T> {
        let apply_one =
            |piece: &PieceTransform<T>| piece.transform.apply(&x.select_columns(&piece.voxels));

        #[cfg(feature = "parallel")]
        let blocks: Vec<Matrix<T>> = if parallel {
            pieces.par_iter().map(apply_one).collect()
        } else {
            pieces.iter().map(apply_one).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let blocks: Vec<Matrix<T>> = {
            let _ = parallel;
            pieces.iter().map(apply_one).collect()
        };

        let mut out = Matrix::zeros(x.rows(), x.cols());
        for (piece, block) in pieces.iter().zip(&blocks) {
            out.scatter_columns(&piece.voxels, block);
        }
        out
    }

    /// Apply every bag and average the results.
    pub fn transform_bags<T: FloatLinalg>(
        x: &Matrix<T>,
        bags: &[Bag<T>],
        parallel: bool,
    ) -> Matrix<T> {
        let mut acc = Matrix::zeros(x.rows(), x.cols());
        for bag in bags {
            acc.add_assign(&Self::transform_pieces(x, &bag.pieces, parallel));
        }
        if bags.len() > 1 {
            acc = acc.scaled(T::one() / T::from(bags.len()).unwrap());
        }
        acc
    }
}

/// Draw `n` row indices with replacement.
fn bootstrap_rows(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = SimpleRng::new(seed ^ 0x9E37_79B9_7F4A_7C15);
    (0..n).map(|_| rng.next_index(n)).collect()
}
