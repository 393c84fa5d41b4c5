#![cfg(feature = "dev")]

use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fmralign::internals::algorithms::method::{AlignmentMethod, MethodConfig};
use fmralign::internals::engine::executor::{AlignmentConfig, PiecewiseExecutor};
use fmralign::internals::engine::parcellation::{pieces, relabel, Parcellation};
use fmralign::internals::engine::validator::Validator;
use fmralign::internals::primitives::errors::AlignError;
use fmralign::internals::primitives::matrix::Matrix;

fn random_matrix(rows: usize, cols: usize, seed: u64) -> Matrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(rows, cols, |_, _| rng.gen_range(-1.0..1.0))
}

fn config(method: AlignmentMethod, parcellation: Parcellation) -> AlignmentConfig<f64> {
    AlignmentConfig {
        method: MethodConfig {
            method,
            ..MethodConfig::default()
        },
        parcellation,
        ..AlignmentConfig::default()
    }
}

// ============================================================================
// Parcellation
// ============================================================================

#[test]
fn test_relabel_and_pieces() {
    let labels = relabel(&[5, 2, 5, 9]);
    assert_eq!(labels, vec![1, 0, 1, 2]);
    assert_eq!(pieces(&labels), vec![vec![1], vec![0, 2], vec![3]]);
}

#[test]
fn test_explicit_labels_are_validated() {
    let x = random_matrix(4, 3, 1);
    let result = Parcellation::Labels(vec![0, 1]).resolve(&x, 0, 10);
    assert_eq!(
        result,
        Err(AlignError::InvalidLabels {
            got: 2,
            expected: 3
        })
    );
}

#[test]
fn test_kmeans_piece_bounds() {
    let x = random_matrix(4, 3, 2);
    assert!(matches!(
        Parcellation::KMeans(0).resolve(&x, 0, 10),
        Err(AlignError::InvalidPieces { .. })
    ));
    assert!(matches!(
        Parcellation::KMeans(4).resolve(&x, 0, 10),
        Err(AlignError::InvalidPieces { .. })
    ));
    assert_eq!(Parcellation::KMeans(1).resolve(&x, 0, 10).unwrap(), vec![0, 0, 0]);
}

#[test]
fn test_kmeans_groups_similar_voxels() {
    // Voxels 0..3 share one profile, voxels 3..6 another.
    let x = Matrix::from_fn(5, 6, |i, j| {
        let base = if j < 3 { i as f64 } else { 10.0 - 2.0 * i as f64 };
        base + 0.01 * j as f64
    });
    let labels = Parcellation::KMeans(2).resolve(&x, 4, 100).unwrap();
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[1], labels[2]);
    assert_eq!(labels[3], labels[4]);
    assert_eq!(labels[4], labels[5]);
    assert_ne!(labels[0], labels[3]);
}

#[test]
fn test_stochastic_parcellations() {
    assert!(Parcellation::KMeans(3).is_stochastic());
    assert!(!Parcellation::KMeans(1).is_stochastic());
    assert!(!Parcellation::Labels(vec![0, 1]).is_stochastic());
    assert_eq!(Parcellation::default(), Parcellation::KMeans(1));
}

// ============================================================================
// Executor
// ============================================================================

#[test]
fn test_identity_method_returns_input() {
    let x = random_matrix(6, 5, 3);
    let y = random_matrix(6, 5, 4);
    let cfg = config(
        AlignmentMethod::Identity,
        Parcellation::Labels(vec![0, 1, 0, 1, 2]),
    );

    let bags = PiecewiseExecutor::fit(&x, &y, &cfg).unwrap();
    assert_eq!(bags.len(), 1);
    assert_eq!(bags[0].pieces.len(), 3);
    assert_eq!(PiecewiseExecutor::transform_bags(&x, &bags, cfg.parallel), x);
}

#[test]
fn test_piecewise_orthogonal_recovers_block_maps() {
    // Swap voxels inside each parcel {0, 2} and {1, 3}.
    let x = random_matrix(12, 4, 5);
    let y = Matrix::from_fn(12, 4, |i, j| x[(i, [2, 3, 0, 1][j])]);
    let cfg = config(
        AlignmentMethod::ScaledOrthogonal,
        Parcellation::Labels(vec![0, 1, 0, 1]),
    );

    let bags = PiecewiseExecutor::fit(&x, &y, &cfg).unwrap();
    let out = PiecewiseExecutor::transform_bags(&x, &bags, cfg.parallel);
    for (a, b) in out.as_slice().iter().zip(y.as_slice()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-8);
    }
}

#[test]
fn test_deterministic_parcellation_collapses_bags() {
    let x = random_matrix(6, 4, 6);
    let mut cfg = config(
        AlignmentMethod::ScaledOrthogonal,
        Parcellation::Labels(vec![0, 0, 1, 1]),
    );
    cfg.n_bags = 4;

    let bags = PiecewiseExecutor::fit(&x, &x, &cfg).unwrap();
    assert_eq!(bags.len(), 1);
}

#[test]
fn test_kmeans_bagging() {
    let x = random_matrix(10, 6, 7);
    let y = random_matrix(10, 6, 8);
    let mut cfg = config(AlignmentMethod::Identity, Parcellation::KMeans(2));
    cfg.n_bags = 3;
    cfg.seed = 11;

    let bags = PiecewiseExecutor::fit(&x, &y, &cfg).unwrap();
    assert_eq!(bags.len(), 3);
    for bag in &bags {
        assert_eq!(bag.labels.len(), 6);
        let covered: usize = bag.pieces.iter().map(|p| p.voxels.len()).sum();
        assert_eq!(covered, 6);
    }
    // Averaging identity maps is still the identity.
    let out = PiecewiseExecutor::transform_bags(&x, &bags, false);
    for (a, b) in out.as_slice().iter().zip(x.as_slice()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    let x = random_matrix(8, 6, 9);
    let y = random_matrix(8, 6, 10);
    let mut cfg = config(
        AlignmentMethod::ScaledOrthogonal,
        Parcellation::Labels(vec![0, 0, 1, 1, 2, 2]),
    );

    cfg.parallel = false;
    let seq = PiecewiseExecutor::fit(&x, &y, &cfg).unwrap();
    cfg.parallel = true;
    let par = PiecewiseExecutor::fit(&x, &y, &cfg).unwrap();
    assert_eq!(seq, par);
    assert_eq!(
        PiecewiseExecutor::transform_bags(&x, &seq, false),
        PiecewiseExecutor::transform_bags(&x, &par, true)
    );
}

// ============================================================================
// Validator
// ============================================================================

#[test]
fn test_validator_matrices() {
    let good = random_matrix(3, 2, 12);
    assert!(Validator::validate_pair(&good, &good).is_ok());

    let mut bad = good.clone();
    bad[(1, 1)] = f64::NAN;
    assert!(matches!(
        Validator::validate_pair(&good, &bad),
        Err(AlignError::InvalidNumericValue(_))
    ));

    let other = random_matrix(3, 3, 13);
    assert!(matches!(
        Validator::validate_pair(&good, &other),
        Err(AlignError::ShapeMismatch { .. })
    ));

    let empty = Matrix::<f64>::zeros(0, 2);
    assert_eq!(
        Validator::validate_pair(&empty, &empty),
        Err(AlignError::EmptyInput)
    );

    assert!(Validator::validate_transform_input(&good, 3).is_err());
}

#[test]
fn test_validator_parameters() {
    assert!(Validator::validate_alphas(&[0.1, 1.0]).is_ok());
    assert!(Validator::validate_alphas::<f64>(&[]).is_err());
    assert_eq!(
        Validator::validate_alphas(&[1.0, -2.0]),
        Err(AlignError::InvalidAlpha(-2.0))
    );
    assert!(Validator::validate_regularization(f64::INFINITY).is_err());
    assert!(Validator::validate_tolerance(0.0).is_err());
    assert!(Validator::validate_iterations(0).is_err());
    assert!(Validator::validate_kfold(1).is_err());
    assert!(Validator::validate_bags(0).is_err());
    assert!(Validator::validate_subjects(&[random_matrix(2, 2, 14)]).is_err());
    assert_eq!(
        Validator::validate_no_duplicates(Some("seed")),
        Err(AlignError::DuplicateParameter { parameter: "seed" })
    );
}
