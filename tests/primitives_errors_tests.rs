#![cfg(feature = "dev")]

use fmralign::internals::primitives::errors::AlignError;

#[test]
fn test_align_error_display() {
    // EmptyInput
    let err = AlignError::EmptyInput;
    assert_eq!(format!("{}", err), "Input matrices are empty");

    // InvalidInput
    let err = AlignError::InvalidInput("test error".to_string());
    assert_eq!(format!("{}", err), "Invalid input: test error");

    // ShapeMismatch
    let err = AlignError::ShapeMismatch {
        expected: (10, 4),
        got: (10, 5),
    };
    assert_eq!(format!("{}", err), "Shape mismatch: expected 10x4, got 10x5");

    // InvalidNumericValue
    let err = AlignError::InvalidNumericValue("source[0, 1]=NaN".to_string());
    assert_eq!(
        format!("{}", err),
        "Invalid numeric value: source[0, 1]=NaN"
    );

    // TooFewSamples
    let err = AlignError::TooFewSamples { got: 3, min: 5 };
    assert_eq!(
        format!("{}", err),
        "Too few samples: got 3, need at least 5"
    );

    // InvalidAlpha
    let err = AlignError::InvalidAlpha(-1.0);
    assert_eq!(
        format!("{}", err),
        "Invalid alpha: -1 (must be > 0 and finite)"
    );

    // InvalidRegularization
    let err = AlignError::InvalidRegularization(0.0);
    assert_eq!(
        format!("{}", err),
        "Invalid regularization: 0 (must be > 0 and finite)"
    );

    // InvalidTolerance
    let err = AlignError::InvalidTolerance(-1.0);
    assert_eq!(
        format!("{}", err),
        "Invalid tolerance: -1 (must be > 0 and finite)"
    );

    // InvalidIterations
    let err = AlignError::InvalidIterations(0);
    assert_eq!(
        format!("{}", err),
        "Invalid iterations: 0 (must be at least 1)"
    );

    // InvalidFolds
    let err = AlignError::InvalidFolds(1);
    assert_eq!(
        format!("{}", err),
        "Invalid number of folds: 1 (must be at least 2)"
    );

    // InvalidPieces
    let err = AlignError::InvalidPieces {
        n_pieces: 12,
        n_voxels: 10,
    };
    assert_eq!(
        format!("{}", err),
        "Invalid n_pieces: 12 (must be between 1 and n_voxels 10)"
    );

    // InvalidBags
    let err = AlignError::InvalidBags(0);
    assert_eq!(format!("{}", err), "Invalid n_bags: 0 (must be at least 1)");

    // InvalidLabels
    let err = AlignError::InvalidLabels {
        got: 3,
        expected: 4,
    };
    assert_eq!(
        format!("{}", err),
        "Invalid labels: got 3 labels for 4 voxels"
    );

    // SubjectOutOfRange
    let err = AlignError::SubjectOutOfRange {
        index: 5,
        n_subjects: 3,
    };
    assert_eq!(
        format!("{}", err),
        "Subject index 5 out of range (3 subjects)"
    );

    // DecompositionFailed
    let err = AlignError::DecompositionFailed("SVD of cross-covariance");
    assert_eq!(
        format!("{}", err),
        "Decomposition failed: SVD of cross-covariance"
    );

    // UnsupportedFeature
    let err = AlignError::UnsupportedFeature {
        adapter: "Pairwise",
        feature: "n_iter",
    };
    assert_eq!(
        format!("{}", err),
        "Adapter 'Pairwise' does not support feature: n_iter"
    );

    // DuplicateParameter
    let err = AlignError::DuplicateParameter {
        parameter: "method",
    };
    assert_eq!(
        format!("{}", err),
        "Parameter 'method' was set multiple times. Each parameter can only be configured once."
    );
}

#[test]
fn test_align_error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}

    let err = AlignError::EmptyInput;
    takes_error(&err);

    let boxed: Box<dyn std::error::Error> = Box::new(AlignError::InvalidBags(0));
    assert!(boxed.to_string().contains("n_bags"));
}

#[test]
fn test_align_error_clone_and_eq() {
    let err = AlignError::InvalidLabels {
        got: 1,
        expected: 2,
    };
    assert_eq!(err.clone(), err);
    assert_ne!(err, AlignError::EmptyInput);
}
