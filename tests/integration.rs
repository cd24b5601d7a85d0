//! Integration tests for the segment prediction pipeline

use clusterlens::{
    predict, CustomerInput, Gender, ModelBundle, ModelStore, PredictError, StoreError,
};
use std::io::Write;
use tempfile::NamedTempFile;

/// Write an artifact fixture to a temp file
fn write_artifact(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A three-cluster bundle with an identity scaler, so raw feature vectors
/// land unchanged in model space. Centroid 0 coincides with the encoding of
/// a male customer aged 30 with income 60k and spending score 50.
fn valid_artifact() -> &'static str {
    r#"{
        "model": {
            "centroids": [
                [1.0, 30.0, 60.0, 50.0],
                [0.0, 20.0, 30.0, 10.0],
                [1.0, 70.0, 140.0, 90.0]
            ]
        },
        "scaler": { "mean": [0.0, 0.0, 0.0, 0.0], "std": [1.0, 1.0, 1.0, 1.0] },
        "feature_names": ["gender", "age", "annual_income", "spending_score"],
        "optimal_k": 3
    }"#
}

fn default_customer() -> CustomerInput {
    CustomerInput {
        gender: Gender::Male,
        age: 30,
        annual_income: 60,
        spending_score: 50,
    }
}

#[test]
fn test_end_to_end_prediction() {
    let artifact = write_artifact(valid_artifact());
    let store = ModelStore::new(artifact.path());
    let bundle = store.load().unwrap();

    let prediction = predict(bundle, &default_customer()).unwrap();

    assert_eq!(prediction.cluster, 0);
    assert_eq!(prediction.distances.len(), bundle.optimal_k);
    assert!(prediction.cluster < bundle.optimal_k);
    assert!((0.0..=1.0).contains(&prediction.confidence));

    // The encoded vector [1, 30, 60, 50] sits exactly on centroid 0.
    assert!(prediction.distances[0].abs() < 1e-12);
    assert!(prediction.distances[1] > 0.0);
    assert!(prediction.distances[2] > 0.0);
}

#[test]
fn test_prediction_covers_input_ranges() {
    let artifact = write_artifact(valid_artifact());
    let store = ModelStore::new(artifact.path());
    let bundle = store.load().unwrap();

    let corners = [
        (Gender::Male, 18, 10, 1),
        (Gender::Male, 80, 150, 100),
        (Gender::Female, 18, 150, 1),
        (Gender::Female, 80, 10, 100),
    ];

    for (gender, age, annual_income, spending_score) in corners {
        let customer = CustomerInput {
            gender,
            age,
            annual_income,
            spending_score,
        };
        let prediction = predict(bundle, &customer).unwrap();

        assert!(prediction.cluster < bundle.optimal_k);
        assert_eq!(prediction.distances.len(), bundle.optimal_k);
        assert!(prediction.distances.iter().all(|d| *d >= 0.0));
        assert!((0.0..=1.0).contains(&prediction.confidence));
    }
}

#[test]
fn test_loader_is_idempotent_and_reads_disk_once() {
    let artifact = write_artifact(valid_artifact());
    let path = artifact.path().to_path_buf();
    let store = ModelStore::new(&path);

    let first: &ModelBundle = store.load().unwrap();

    // Deleting the artifact must not affect the cached bundle.
    drop(artifact);
    assert!(!path.exists());

    let second: &ModelBundle = store.load().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.optimal_k, 3);
}

#[test]
fn test_absent_artifact_halts_all_predictions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    let store = ModelStore::new(&path);

    match store.load() {
        Err(StoreError::ArtifactNotFound { .. }) => {}
        other => panic!("expected ArtifactNotFound, got {:?}", other),
    }

    // A bundle appearing later changes nothing; the failure is terminal
    // for the process lifetime.
    std::fs::write(&path, valid_artifact()).unwrap();
    assert!(matches!(
        store.load(),
        Err(StoreError::ArtifactNotFound { .. })
    ));
}

#[test]
fn test_artifact_missing_model_is_incomplete() {
    let artifact = write_artifact(
        r#"{
            "scaler": { "mean": [0.0, 0.0, 0.0, 0.0], "std": [1.0, 1.0, 1.0, 1.0] },
            "feature_names": ["gender", "age", "annual_income", "spending_score"],
            "optimal_k": 3
        }"#,
    );
    let store = ModelStore::new(artifact.path());

    match store.load() {
        Err(StoreError::IncompleteBundle { field, .. }) => assert_eq!(field, "model"),
        other => panic!("expected IncompleteBundle, got {:?}", other),
    }
}

#[test]
fn test_corrupt_artifact_is_load_failure() {
    let artifact = write_artifact("{ definitely not a bundle");
    let store = ModelStore::new(artifact.path());

    assert!(matches!(store.load(), Err(StoreError::LoadFailure { .. })));
}

#[test]
fn test_reordered_feature_names_fail_to_load() {
    let artifact = write_artifact(
        r#"{
            "model": { "centroids": [[1.0, 30.0, 60.0, 50.0]] },
            "scaler": { "mean": [0.0, 0.0, 0.0, 0.0], "std": [1.0, 1.0, 1.0, 1.0] },
            "feature_names": ["age", "gender", "annual_income", "spending_score"],
            "optimal_k": 1
        }"#,
    );
    let store = ModelStore::new(artifact.path());

    match store.load() {
        Err(StoreError::LoadFailure { cause, .. }) => {
            assert!(cause.contains("feature order mismatch"), "cause: {cause}");
        }
        other => panic!("expected LoadFailure, got {:?}", other),
    }
}

#[test]
fn test_identical_centers_make_confidence_undefined() {
    // Both centers coincide with the encoded default customer, so every
    // center distance is zero and the confidence ratio has a zero
    // denominator.
    let artifact = write_artifact(
        r#"{
            "model": {
                "centroids": [
                    [1.0, 30.0, 60.0, 50.0],
                    [1.0, 30.0, 60.0, 50.0]
                ]
            },
            "scaler": { "mean": [0.0, 0.0, 0.0, 0.0], "std": [1.0, 1.0, 1.0, 1.0] },
            "feature_names": ["gender", "age", "annual_income", "spending_score"],
            "optimal_k": 2
        }"#,
    );
    let store = ModelStore::new(artifact.path());
    let bundle = store.load().unwrap();

    assert!(matches!(
        predict(bundle, &default_customer()),
        Err(PredictError::PredictionFailure(_))
    ));
}

#[test]
fn test_scaling_shifts_assignment() {
    // With a non-trivial scaler the same customer lands on a different
    // center than it would in raw feature space.
    let artifact = write_artifact(
        r#"{
            "model": {
                "centroids": [
                    [1.0, -1.0, -0.5, 0.0],
                    [1.0, 30.0, 60.0, 50.0]
                ]
            },
            "scaler": { "mean": [0.0, 40.0, 77.5, 50.0], "std": [1.0, 10.0, 35.0, 25.0] },
            "feature_names": ["gender", "age", "annual_income", "spending_score"],
            "optimal_k": 2
        }"#,
    );
    let store = ModelStore::new(artifact.path());
    let bundle = store.load().unwrap();

    let prediction = predict(bundle, &default_customer()).unwrap();

    // Scaled vector is [1, -1, -0.5, 0], i.e. exactly centroid 0.
    assert_eq!(prediction.cluster, 0);
    assert!(prediction.distances[0].abs() < 1e-12);
}
