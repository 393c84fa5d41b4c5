//! Entropic optimal transport via log-domain Sinkhorn iterations.
//!
//! ## Purpose
//!
//! Computes the coupling `P` minimizing `<P, C> - reg * H(P)` subject to
//! `P 1 = a` and `Pᵀ 1 = b`, where `H` is the entropy of `P`.
//!
//! ## Design notes
//!
//! * **Log-domain**: Iterates on dual potentials `f`, `g` with log-sum-exp, so
//!   small `reg` or large costs do not underflow.
//! * **Stopping**: After each `g` update the column marginals are exact; the
//!   loop stops once the L1 error of the row marginals is below `tol`.
//!
//! ## Invariants
//!
//! * Coupling entries are non-negative.
//! * Column sums equal `b` after every iteration.
//!
//! ## Non-goals
//!
//! * This module does not solve unregularized (exact) optimal transport.
//! * This module does not handle unbalanced marginals.

use num_traits::Float;

/// Result of a Sinkhorn solve.
#[derive(Debug, Clone)]
pub struct TransportPlan<T> {
    /// Row-major `n x m` coupling.
    pub coupling: Vec<T>,
    /// Iterations performed.
    pub iterations: usize,
    /// L1 error of the row marginals at exit.
    pub marginal_error: T,
    /// Whether `marginal_error < tol` was reached.
    pub converged: bool,
}

/// Numerically stable `log(sum(exp(v)))`.
#[inline]
pub fn log_sum_exp<T: Float, I: Iterator<Item = T> + Clone>(values: I) -> T {
    let max = values.clone().fold(T::neg_infinity(), T::max);
    if !max.is_finite() {
        return max;
    }
    let sum = values.fold(T::zero(), |acc, v| acc + (v - max).exp());
    max + sum.ln()
}

/// Log-domain Sinkhorn for marginals `a` (length `n`), `b` (length `m`) and a
/// row-major `n x m` cost matrix.
pub fn sinkhorn_log<T: Float>(
    a: &[T],
    b: &[T],
    cost: &[T],
    reg: T,
    max_iter: usize,
    tol: T,
) -> TransportPlan<T> {
    let n = a.len();
    let m = b.len();
    debug_assert_eq!(cost.len(), n * m);

    let log_a: Vec<T> = a.iter().map(|&v| v.ln()).collect();
    let log_b: Vec<T> = b.iter().map(|&v| v.ln()).collect();
    let mut f = vec![T::zero(); n];
    let mut g = vec![T::zero(); m];

    let mut iterations = 0;
    let mut marginal_error = T::infinity();

    while iterations < max_iter {
        iterations += 1;

        for i in 0..n {
            let row = &cost[i * m..(i + 1) * m];
            let lse = log_sum_exp(row.iter().zip(g.iter()).map(|(&c, &gj)| (gj - c) / reg));
            f[i] = reg * (log_a[i] - lse);
        }

        for j in 0..m {
            let lse = log_sum_exp((0..n).map(|i| (f[i] - cost[i * m + j]) / reg));
            g[j] = reg * (log_b[j] - lse);
        }

        marginal_error = (0..n).fold(T::zero(), |acc, i| {
            let row_sum = (0..m).fold(T::zero(), |s, j| {
                s + ((f[i] + g[j] - cost[i * m + j]) / reg).exp()
            });
            acc + (row_sum - a[i]).abs()
        });

        if marginal_error < tol {
            break;
        }
    }

    let mut coupling = Vec::with_capacity(n * m);
    for i in 0..n {
        for j in 0..m {
            coupling.push(((f[i] + g[j] - cost[i * m + j]) / reg).exp());
        }
    }

    TransportPlan {
        coupling,
        iterations,
        marginal_error,
        converged: marginal_error < tol,
    }
}
