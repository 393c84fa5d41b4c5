//! Linear sum assignment (Hungarian algorithm).
//!
//! ## Purpose
//!
//! Finds the one-to-one matching between rows and columns of a cost matrix
//! with minimal total cost. Used to compute the optimal voxel permutation.
//!
//! ## Design notes
//!
//! * **Algorithm**: Shortest augmenting paths with row/column potentials, O(n² m).
//! * **Rectangular**: Supports `n_rows <= n_cols`; each row gets a distinct column.
//!
//! ## Invariants
//!
//! * Every row is assigned exactly one column and no column is used twice.
//! * Potentials keep reduced costs non-negative, so the result is optimal.
//!
//! ## Non-goals
//!
//! * This module does not handle forbidden (infinite-cost) assignments.

use num_traits::Float;

use crate::primitives::errors::AlignError;

/// Solve the linear sum assignment problem for a row-major `n_rows x n_cols` cost matrix.
///
/// Returns, for each row, the index of its assigned column.
pub fn linear_sum_assignment<T: Float>(
    cost: &[T],
    n_rows: usize,
    n_cols: usize,
) -> Result<Vec<usize>, AlignError> {
    if cost.len() != n_rows * n_cols {
        return Err(AlignError::InvalidInput(format!(
            "cost buffer of length {} for a {}x{} problem",
            cost.len(),
            n_rows,
            n_cols
        )));
    }
    if n_rows > n_cols {
        return Err(AlignError::InvalidInput(format!(
            "assignment needs n_rows <= n_cols, got {}x{}",
            n_rows, n_cols
        )));
    }
    if let Some(pos) = cost.iter().position(|c| !c.is_finite()) {
        return Err(AlignError::InvalidNumericValue(format!(
            "cost[{}]={}",
            pos,
            cost[pos].to_f64().unwrap_or(f64::NAN)
        )));
    }
    if n_rows == 0 {
        return Ok(Vec::new());
    }

    // 1-based bookkeeping; index 0 is the virtual root of each augmenting path.
    let n = n_rows;
    let m = n_cols;
    let mut u = vec![T::zero(); n + 1];
    let mut v = vec![T::zero(); m + 1];
    let mut owner = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0usize;
        let mut min_reduced = vec![T::infinity(); m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = T::infinity();
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost[(i0 - 1) * m + (j - 1)] - u[i0] - v[j];
                if reduced < min_reduced[j] {
                    min_reduced[j] = reduced;
                    way[j] = j0;
                }
                if min_reduced[j] < delta {
                    delta = min_reduced[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[owner[j]] = u[owner[j]] + delta;
                    v[j] = v[j] - delta;
                } else {
                    min_reduced[j] = min_reduced[j] - delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path.
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=m {
        if owner[j] != 0 {
            assignment[owner[j] - 1] = j - 1;
        }
    }
    Ok(assignment)
}

/// Total cost of an assignment.
pub fn assignment_cost<T: Float>(cost: &[T], n_cols: usize, assignment: &[usize]) -> T {
    assignment
        .iter()
        .enumerate()
        .fold(T::zero(), |acc, (i, &j)| acc + cost[i * n_cols + j])
}
