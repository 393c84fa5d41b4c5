#![cfg(feature = "dev")]

use approx::assert_abs_diff_eq;

use fmralign::internals::primitives::errors::AlignError;
use fmralign::internals::primitives::matrix::Matrix;
use fmralign::internals::primitives::rng::SimpleRng;

fn sample() -> Matrix<f64> {
    Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_checks_buffer_length() {
    assert!(Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).is_ok());
    assert!(matches!(
        Matrix::new(2, 2, vec![1.0, 2.0, 3.0]),
        Err(AlignError::InvalidInput(_))
    ));
}

#[test]
fn test_from_rows_rejects_ragged_rows() {
    let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
    assert!(matches!(result, Err(AlignError::InvalidInput(_))));
}

#[test]
fn test_identity_and_from_fn() {
    let eye = Matrix::<f64>::identity(3);
    let built = Matrix::from_fn(3, 3, |i, j| if i == j { 1.0 } else { 0.0 });
    assert_eq!(eye, built);
}

#[test]
fn test_accessors() {
    let m = sample();
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    assert_eq!(m.column(2), vec![3.0, 6.0]);
    assert_eq!(m[(1, 0)], 4.0);
    assert!(m.is_finite());
    assert!(!m.is_empty());
    assert!(Matrix::<f64>::zeros(0, 3).is_empty());
    assert_eq!(m.clone().into_vec(), m.as_slice().to_vec());
}

// ============================================================================
// Structural Operations
// ============================================================================

#[test]
fn test_transpose() {
    let t = sample().transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn test_select_and_scatter_columns() {
    let m = sample();
    let block = m.select_columns(&[2, 0]);
    assert_eq!(block.as_slice(), &[3.0, 1.0, 6.0, 4.0]);

    let mut out = Matrix::zeros(2, 3);
    out.scatter_columns(&[2, 0], &block);
    assert_eq!(out.as_slice(), &[1.0, 0.0, 3.0, 4.0, 0.0, 6.0]);
}

#[test]
fn test_select_rows_allows_repeats() {
    let m = sample();
    let r = m.select_rows(&[1, 1, 0]);
    assert_eq!(r.shape(), (3, 3));
    assert_eq!(r.row(0), r.row(1));
    assert_eq!(r.row(2), &[1.0, 2.0, 3.0]);
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_column_means_and_centering() {
    let mut m = sample();
    let means = m.column_means();
    assert_eq!(means, vec![2.5, 3.5, 4.5]);

    m.center_columns(&means);
    assert_eq!(m.column_means(), vec![0.0, 0.0, 0.0]);

    m.add_to_columns(&means);
    assert_eq!(m, sample());
}

#[test]
fn test_matmul() {
    let a = sample();
    let b = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
    let c = a.matmul(&b);
    assert_eq!(c.shape(), (2, 2));
    assert_eq!(c.as_slice(), &[4.0, 5.0, 10.0, 11.0]);

    let eye = Matrix::identity(3);
    assert_eq!(a.matmul(&eye), a);
}

#[test]
fn test_norm_scale_and_accumulate() {
    let m = Matrix::from_rows(&[vec![3.0, 4.0]]).unwrap();
    assert_abs_diff_eq!(m.frobenius_norm(), 5.0, epsilon = 1e-12);

    let mut acc = m.scaled(2.0);
    acc.add_assign(&m);
    assert_eq!(acc.as_slice(), &[9.0, 12.0]);

    let mut sq = Matrix::<f64>::zeros(2, 2);
    sq.add_diagonal(0.5);
    assert_eq!(sq.as_slice(), &[0.5, 0.0, 0.0, 0.5]);
}

// ============================================================================
// RNG
// ============================================================================

#[test]
fn test_rng_is_reproducible() {
    let mut a = SimpleRng::new(42);
    let mut b = SimpleRng::new(42);
    for _ in 0..10 {
        assert_eq!(a.next_u32(), b.next_u32());
    }

    let mut r = SimpleRng::new(7);
    for _ in 0..100 {
        let f = r.next_f64();
        assert!((0.0..1.0).contains(&f));
        assert!(r.next_index(5) < 5);
    }
    assert_eq!(r.next_index(0), 0);
}

#[test]
fn test_rng_shuffle_is_permutation() {
    let mut values: Vec<usize> = (0..20).collect();
    SimpleRng::new(3).shuffle(&mut values);
    let mut sorted = values.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..20).collect::<Vec<_>>());
}
