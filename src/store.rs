//! Model bundle loading and process-lifetime caching

use crate::model::{ClusteringModel, ModelBundle, StandardScaler, FEATURE_NAMES};
use log::{debug, info};
use ndarray::{Array1, Array2};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default artifact location, relative to the working directory
pub const DEFAULT_ARTIFACT_PATH: &str = "customer_segmentation_model.json";

/// Errors raised while loading the model artifact
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The artifact file does not exist
    #[error("model artifact not found at {}", .path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The artifact exists but could not be read, parsed, or validated
    #[error("failed to load model artifact {}: {cause}", .path.display())]
    LoadFailure { path: PathBuf, cause: String },

    /// The artifact parsed but a required bundle field is absent
    #[error("model artifact {} is missing required field `{field}`", .path.display())]
    IncompleteBundle { path: PathBuf, field: &'static str },
}

/// On-disk artifact schema. Fields are optional here so that a missing one
/// can be reported as `IncompleteBundle` naming the field, instead of as a
/// generic parse error.
#[derive(Debug, Deserialize)]
struct RawArtifact {
    model: Option<RawModel>,
    scaler: Option<RawScaler>,
    feature_names: Option<Vec<String>>,
    optimal_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    centroids: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

/// Load-once handle for the model artifact.
///
/// The load outcome (success or failure) is computed at most once per store;
/// every later call returns the cached bundle or the cached error without
/// touching the filesystem again. A changed artifact on disk is not picked
/// up until a new store is constructed.
pub struct ModelStore {
    path: PathBuf,
    bundle: OnceCell<Result<ModelBundle, StoreError>>,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bundle: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the bundle, reading and validating the artifact at most once
    pub fn load(&self) -> Result<&ModelBundle, StoreError> {
        let outcome = self.bundle.get_or_init(|| read_bundle(&self.path));
        outcome.as_ref().map_err(Clone::clone)
    }
}

fn read_bundle(path: &Path) -> Result<ModelBundle, StoreError> {
    debug!("loading model artifact from {}", path.display());

    if !path.exists() {
        return Err(StoreError::ArtifactNotFound {
            path: path.to_path_buf(),
        });
    }

    let load_failure = |cause: String| StoreError::LoadFailure {
        path: path.to_path_buf(),
        cause,
    };

    let contents = fs::read_to_string(path).map_err(|e| load_failure(e.to_string()))?;
    let raw: RawArtifact =
        serde_json::from_str(&contents).map_err(|e| load_failure(e.to_string()))?;

    let bundle = validate(raw, path)?;
    info!(
        "model artifact loaded: {} clusters over {} features",
        bundle.optimal_k,
        FEATURE_NAMES.len()
    );

    Ok(bundle)
}

/// Turn the loosely-typed artifact into a validated `ModelBundle`,
/// failing fast on missing fields and internal inconsistencies
fn validate(raw: RawArtifact, path: &Path) -> Result<ModelBundle, StoreError> {
    let missing = |field: &'static str| StoreError::IncompleteBundle {
        path: path.to_path_buf(),
        field,
    };
    let invalid = |cause: String| StoreError::LoadFailure {
        path: path.to_path_buf(),
        cause,
    };

    let model = raw.model.ok_or_else(|| missing("model"))?;
    let scaler = raw.scaler.ok_or_else(|| missing("scaler"))?;
    let feature_names = raw.feature_names.ok_or_else(|| missing("feature_names"))?;
    let optimal_k = raw.optimal_k.ok_or_else(|| missing("optimal_k"))?;

    let n_features = FEATURE_NAMES.len();

    // The artifact must agree with the feature order used for encoding;
    // a silent mismatch would misalign every prediction.
    if feature_names.len() != n_features
        || !feature_names
            .iter()
            .zip(FEATURE_NAMES)
            .all(|(declared, expected)| declared.as_str() == expected)
    {
        return Err(invalid(format!(
            "feature order mismatch: expected {:?}, artifact declares {:?}",
            FEATURE_NAMES, feature_names
        )));
    }

    if optimal_k == 0 {
        return Err(invalid("optimal_k must be positive".to_string()));
    }
    if model.centroids.len() != optimal_k {
        return Err(invalid(format!(
            "centroid count {} does not match optimal_k {}",
            model.centroids.len(),
            optimal_k
        )));
    }

    let mut flat = Vec::with_capacity(optimal_k * n_features);
    for (cluster_idx, row) in model.centroids.iter().enumerate() {
        if row.len() != n_features {
            return Err(invalid(format!(
                "centroid {} has {} values, expected {}",
                cluster_idx,
                row.len(),
                n_features
            )));
        }
        flat.extend_from_slice(row);
    }
    if flat.iter().any(|v| !v.is_finite()) {
        return Err(invalid("centroid matrix contains non-finite values".to_string()));
    }
    let centroids = Array2::from_shape_vec((optimal_k, n_features), flat)
        .map_err(|e| invalid(e.to_string()))?;

    if scaler.mean.len() != n_features || scaler.std.len() != n_features {
        return Err(invalid(format!(
            "scaler expects {} features (mean has {}, std has {})",
            n_features,
            scaler.mean.len(),
            scaler.std.len()
        )));
    }
    if scaler.mean.iter().any(|v| !v.is_finite()) {
        return Err(invalid("scaler mean contains non-finite values".to_string()));
    }
    if scaler.std.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(invalid(
            "scaler std entries must be finite and positive".to_string(),
        ));
    }

    Ok(ModelBundle {
        model: ClusteringModel::new(centroids),
        scaler: StandardScaler::new(Array1::from_vec(scaler.mean), Array1::from_vec(scaler.std)),
        feature_names,
        optimal_k,
    })
}
