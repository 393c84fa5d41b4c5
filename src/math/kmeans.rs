//! K-means clustering with k-means++ seeding.
//!
//! ## Purpose
//!
//! Groups points (stored row-major, one point per row) into `k` clusters.
//! The parcellation layer uses it to cluster voxel profiles.
//!
//! ## Design notes
//!
//! * **Seeding**: k-means++ driven by [`SimpleRng`], reproducible per seed.
//! * **Empty clusters**: Re-seeded with the point farthest from its centroid.
//! * **Stopping**: Labels unchanged between two passes, or `max_iter` reached.
//!
//! ## Invariants
//!
//! * Every label is in `0..k` and every cluster is non-empty when `k <= n`.

use tracing::trace;

use crate::math::distance::DistanceLinalg;
use crate::primitives::matrix::Matrix;
use crate::primitives::rng::SimpleRng;

/// Outcome of a k-means run.
#[derive(Debug, Clone)]
pub struct KMeansResult<T> {
    /// Cluster label of each point.
    pub labels: Vec<usize>,
    /// `k x dim` centroids.
    pub centroids: Matrix<T>,
    /// Lloyd iterations performed.
    pub iterations: usize,
    /// Sum of squared distances to assigned centroids.
    pub inertia: T,
}

/// Cluster the rows of `points` into `k` groups.
///
/// Callers guarantee `1 <= k <= points.rows()`.
pub fn kmeans<T: DistanceLinalg>(
    points: &Matrix<T>,
    k: usize,
    max_iter: usize,
    seed: u64,
) -> KMeansResult<T> {
    let n = points.rows();
    let dim = points.cols();
    debug_assert!(k >= 1 && k <= n);

    let mut rng = SimpleRng::new(seed);
    let mut centroids = seed_plus_plus(points, k, &mut rng);
    let mut labels = vec![usize::MAX; n];
    let mut distances = vec![T::zero(); n];
    let mut iterations = 0;

    while iterations < max_iter.max(1) {
        iterations += 1;

        // Assignment step
        let mut changed = false;
        for i in 0..n {
            let (best, d2) = nearest(points.row(i), &centroids);
            distances[i] = d2;
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }

        if !changed {
            break;
        }

        // Update step
        let mut sums = Matrix::zeros(k, dim);
        let mut counts = vec![0usize; k];
        for i in 0..n {
            let c = labels[i];
            counts[c] += 1;
            for (d, &v) in points.row(i).iter().enumerate() {
                sums[(c, d)] = sums[(c, d)] + v;
            }
        }

        for c in 0..k {
            if counts[c] > 0 {
                continue;
            }
            // Steal the worst-fitting point for the empty cluster.
            let far = (0..n)
                .filter(|&i| counts[labels[i]] > 1)
                .max_by(|&a, &b| {
                    distances[a]
                        .partial_cmp(&distances[b])
                        .unwrap_or(core::cmp::Ordering::Equal)
                });
            if let Some(i) = far {
                let old = labels[i];
                counts[old] -= 1;
                counts[c] = 1;
                for (d, &v) in points.row(i).iter().enumerate() {
                    sums[(old, d)] = sums[(old, d)] - v;
                    sums[(c, d)] = v;
                }
                labels[i] = c;
                distances[i] = T::zero();
            }
        }

        for c in 0..k {
            if counts[c] == 0 {
                continue;
            }
            let count = T::from(counts[c]).unwrap();
            for d in 0..dim {
                centroids[(c, d)] = sums[(c, d)] / count;
            }
        }

        trace!(iteration = iterations, changed, "k-means pass");
    }

    let inertia = (0..n).fold(T::zero(), |acc, i| {
        let c = labels[i];
        let centroid = &centroids.as_slice()[c * dim..(c + 1) * dim];
        acc + T::squared_euclidean(points.row(i), centroid)
    });

    KMeansResult {
        labels,
        centroids,
        iterations,
        inertia,
    }
}

/// Index and squared distance of the closest centroid.
fn nearest<T: DistanceLinalg>(point: &[T], centroids: &Matrix<T>) -> (usize, T) {
    let mut best = 0;
    let mut best_d2 = T::infinity();
    for c in 0..centroids.rows() {
        let d2 = T::squared_euclidean(point, centroids.row(c));
        if d2 < best_d2 {
            best_d2 = d2;
            best = c;
        }
    }
    (best, best_d2)
}

/// k-means++ seeding: each new centroid is drawn with probability proportional
/// to its squared distance from the closest centroid chosen so far.
fn seed_plus_plus<T: DistanceLinalg>(points: &Matrix<T>, k: usize, rng: &mut SimpleRng) -> Matrix<T> {
    let n = points.rows();
    let mut chosen = Vec::with_capacity(k);
    chosen.push(rng.next_index(n));

    let mut closest: Vec<T> = (0..n)
        .map(|i| T::squared_euclidean(points.row(i), points.row(chosen[0])))
        .collect();

    while chosen.len() < k {
        let total = closest.iter().fold(T::zero(), |acc, &d| acc + d);
        let next = if total > T::zero() {
            let target = T::from(rng.next_f64()).unwrap() * total;
            let mut acc = T::zero();
            let mut pick = n - 1;
            for (i, &d) in closest.iter().enumerate() {
                acc = acc + d;
                if acc > target {
                    pick = i;
                    break;
                }
            }
            pick
        } else {
            // All remaining points coincide with a centroid; take the first unused.
            (0..n).find(|i| !chosen.contains(i)).unwrap_or(0)
        };

        chosen.push(next);
        for (i, d) in closest.iter_mut().enumerate() {
            let d_new = T::squared_euclidean(points.row(i), points.row(next));
            if d_new < *d {
                *d = d_new;
            }
        }
    }

    points.select_rows(&chosen)
}
