#![cfg(feature = "dev")]

use fmralign::internals::math::assignment::{assignment_cost, linear_sum_assignment};
use fmralign::internals::primitives::errors::AlignError;

#[test]
fn test_square_assignment() {
    let cost = [4.0, 1.0, 3.0, 2.0, 0.0, 5.0, 3.0, 2.0, 2.0];
    let assignment = linear_sum_assignment(&cost, 3, 3).unwrap();
    assert_eq!(assignment, vec![1, 0, 2]);
    assert_eq!(assignment_cost(&cost, 3, &assignment), 5.0);
}

#[test]
fn test_rectangular_assignment() {
    // 2 rows, 3 columns: every row gets a distinct column.
    let cost = [1.0, 5.0, 0.0, 3.0, 0.0, 4.0];
    let assignment = linear_sum_assignment(&cost, 2, 3).unwrap();
    assert_eq!(assignment, vec![2, 1]);
}

#[test]
fn test_assignment_is_a_permutation() {
    let n = 7;
    let cost: Vec<f64> = (0..n * n)
        .map(|k| (((k * 37) % 11) as f64) - 0.5 * ((k * 13) % 5) as f64)
        .collect();
    let assignment = linear_sum_assignment(&cost, n, n).unwrap();

    let mut seen = assignment.clone();
    seen.sort_unstable();
    assert_eq!(seen, (0..n).collect::<Vec<_>>());

    // Not worse than the identity assignment.
    let identity: Vec<usize> = (0..n).collect();
    assert!(assignment_cost(&cost, n, &assignment) <= assignment_cost(&cost, n, &identity));
}

#[test]
fn test_recovers_hidden_permutation() {
    let perm = [3, 0, 4, 1, 2];
    let n = perm.len();
    let cost: Vec<f64> = (0..n * n)
        .map(|k| if perm[k / n] == k % n { 0.0 } else { 1.0 })
        .collect();
    assert_eq!(linear_sum_assignment(&cost, n, n).unwrap(), perm.to_vec());
}

#[test]
fn test_invalid_inputs() {
    assert!(matches!(
        linear_sum_assignment(&[1.0, 2.0, 3.0], 2, 2),
        Err(AlignError::InvalidInput(_))
    ));
    assert!(matches!(
        linear_sum_assignment(&[1.0, 2.0], 2, 1),
        Err(AlignError::InvalidInput(_))
    ));
    assert!(matches!(
        linear_sum_assignment(&[1.0, f64::NAN, 0.0, 1.0], 2, 2),
        Err(AlignError::InvalidNumericValue(_))
    ));
}

#[test]
fn test_empty_problem() {
    assert_eq!(linear_sum_assignment::<f64>(&[], 0, 0).unwrap(), Vec::<usize>::new());
}
