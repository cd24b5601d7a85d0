//! Typed model bundle and K-Means scoring math

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Feature order the model and scaler were fitted with
pub const FEATURE_NAMES: [&str; 4] = ["gender", "age", "annual_income", "spending_score"];

/// Errors raised while scaling or scoring a feature vector
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature vector contains non-finite values")]
    NonFiniteInput,
}

/// Fitted per-feature standardization parameters
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl StandardScaler {
    pub fn new(mean: Array1<f64>, std: Array1<f64>) -> Self {
        Self { mean, std }
    }

    /// Number of features the scaler was fitted with
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Normalize a raw feature vector into model feature space
    pub fn transform(&self, features: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
        if features.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteInput);
        }

        Ok((features - &self.mean) / &self.std)
    }
}

/// Fitted clustering model, held as its centroid matrix of shape
/// (n_clusters, n_features)
#[derive(Debug, Clone)]
pub struct ClusteringModel {
    centroids: Array2<f64>,
}

impl ClusteringModel {
    pub fn new(centroids: Array2<f64>) -> Self {
        Self { centroids }
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.centroids.ncols()
    }

    /// Cluster centers in scaled feature space
    pub fn centroids(&self) -> &Array2<f64> {
        &self.centroids
    }

    /// Assign a scaled feature vector to its nearest cluster center
    pub fn predict(&self, features: &Array1<f64>) -> Result<usize, ModelError> {
        let distances = self.transform(features)?;

        let mut min_distance = f64::INFINITY;
        let mut closest_cluster = 0;
        for (cluster_idx, &distance) in distances.iter().enumerate() {
            if distance < min_distance {
                min_distance = distance;
                closest_cluster = cluster_idx;
            }
        }

        Ok(closest_cluster)
    }

    /// Distance of a scaled feature vector to every cluster center,
    /// ordered by cluster index
    pub fn transform(&self, features: &Array1<f64>) -> Result<Array1<f64>, ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteInput);
        }

        let mut distances = Array1::zeros(self.n_clusters());
        for (cluster_idx, centroid) in self.centroids.outer_iter().enumerate() {
            distances[cluster_idx] = features
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
        }

        Ok(distances)
    }
}

/// Validated model bundle loaded from the artifact
#[derive(Debug, Clone)]
pub struct ModelBundle {
    /// Fitted clustering model
    pub model: ClusteringModel,
    /// Fitted input scaler
    pub scaler: StandardScaler,
    /// Feature order declared by the artifact
    pub feature_names: Vec<String>,
    /// Number of clusters the model was fitted with
    pub optimal_k: usize,
}
