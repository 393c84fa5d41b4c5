#![cfg(feature = "dev")]

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fmralign::internals::algorithms::procrustes::scaled_procrustes;
use fmralign::internals::primitives::errors::AlignError;
use fmralign::internals::primitives::matrix::Matrix;

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Matrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(rows, cols, |_, _| rng.gen_range(-1.0..1.0))
}

/// Product of two plane rotations: orthogonal, not a permutation.
fn rotation(p: usize) -> Matrix<f64> {
    let mut q = Matrix::identity(p);
    let (c, s) = (0.6, 0.8);
    q[(0, 0)] = c;
    q[(0, 1)] = -s;
    q[(1, 0)] = s;
    q[(1, 1)] = c;

    let mut r = Matrix::identity(p);
    let (c2, s2) = (0.28, 0.96);
    r[(p - 2, p - 2)] = c2;
    r[(p - 2, p - 1)] = s2;
    r[(p - 1, p - 2)] = -s2;
    r[(p - 1, p - 1)] = c2;
    q.matmul(&r)
}

fn assert_matrix_eq(a: &Matrix<f64>, b: &Matrix<f64>, eps: f64) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
        assert_abs_diff_eq!(x, y, epsilon = eps);
    }
}

#[test]
fn test_primal_recovers_rotation() {
    let x = random_matrix(20, 4, 1);
    let q = rotation(4);
    let y = x.matmul(&q);

    let sol = scaled_procrustes(&x, &y, false, Some(true)).unwrap();
    assert_matrix_eq(&sol.rotation, &q, 1e-8);
    assert_eq!(sol.scale, 1.0);
}

#[test]
fn test_dual_matches_target() {
    // Fewer samples than voxels.
    let x = random_matrix(3, 6, 2);
    let y = x.matmul(&rotation(6));

    let dual = scaled_procrustes(&x, &y, true, Some(false)).unwrap();
    assert_matrix_eq(&x.matmul(&dual.rotation).scaled(dual.scale), &y, 1e-8);
    assert_abs_diff_eq!(dual.scale, 1.0, epsilon = 1e-8);

    let primal = scaled_procrustes(&x, &y, true, Some(true)).unwrap();
    assert_matrix_eq(&x.matmul(&primal.rotation).scaled(primal.scale), &y, 1e-8);
}

#[test]
fn test_dual_and_primal_agree_with_full_rank() {
    let x = random_matrix(12, 5, 3);
    let y = random_matrix(12, 5, 4);

    let primal = scaled_procrustes(&x, &y, true, Some(true)).unwrap();
    let dual = scaled_procrustes(&x, &y, true, Some(false)).unwrap();
    assert_matrix_eq(&primal.rotation, &dual.rotation, 1e-8);
    assert_abs_diff_eq!(primal.scale, dual.scale, epsilon = 1e-10);
}

#[test]
fn test_rotation_is_orthogonal() {
    let x = random_matrix(15, 5, 5);
    let y = random_matrix(15, 5, 6);
    let sol = scaled_procrustes(&x, &y, true, None).unwrap();

    let rtr = sol.rotation.transpose().matmul(&sol.rotation);
    assert_matrix_eq(&rtr, &Matrix::identity(5), 1e-10);
}

#[test]
fn test_singular_cross_covariance_stays_orthogonal() {
    // A silent source voxel makes `XᵀY` rank deficient.
    let mut x = random_matrix(15, 4, 11);
    for i in 0..15 {
        x[(i, 2)] = 0.0;
    }
    let y = random_matrix(15, 4, 12);

    let sol = scaled_procrustes(&x, &y, true, Some(true)).unwrap();
    assert!(sol.rotation.is_finite());
    assert!(sol.scale.is_finite());
    let rtr = sol.rotation.transpose().matmul(&sol.rotation);
    assert_matrix_eq(&rtr, &Matrix::identity(4), 1e-8);
}

#[test]
fn test_scale_is_recovered() {
    let x = random_matrix(10, 3, 7);
    let y = x.matmul(&rotation(3)).scaled(2.5);

    let sol = scaled_procrustes(&x, &y, true, None).unwrap();
    assert_abs_diff_eq!(sol.scale, 2.5, epsilon = 1e-10);

    let unscaled = scaled_procrustes(&x, &y, false, None).unwrap();
    assert_eq!(unscaled.scale, 1.0);
    assert_matrix_eq(&unscaled.rotation, &sol.rotation, 1e-10);
}

#[test]
fn test_zero_input_gives_identity() {
    let x = Matrix::zeros(4, 3);
    let y = random_matrix(4, 3, 8);

    let sol = scaled_procrustes(&x, &y, true, None).unwrap();
    assert_eq!(sol.rotation, Matrix::identity(3));
    assert_eq!(sol.scale, 1.0);

    let sol = scaled_procrustes(&y, &x, true, None).unwrap();
    assert_eq!(sol.rotation, Matrix::identity(3));
}

#[test]
fn test_shape_mismatch() {
    let x = random_matrix(4, 3, 9);
    let y = random_matrix(4, 2, 10);
    assert!(matches!(
        scaled_procrustes(&x, &y, true, None),
        Err(AlignError::ShapeMismatch { .. })
    ));
}
