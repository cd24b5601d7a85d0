//! ClusterLens: customer segment prediction from a pre-trained K-Means bundle
//!
//! This library loads a serialized model bundle (clustering model, fitted
//! scaler, feature order, cluster count), encodes a customer's attributes
//! into the model's feature space, and reports the assigned segment together
//! with the distance to every cluster center.

pub mod cli;
pub mod model;
pub mod service;
pub mod store;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use model::{ClusteringModel, ModelBundle, ModelError, StandardScaler, FEATURE_NAMES};
pub use service::{predict, CustomerInput, Gender, PredictError, Prediction};
pub use store::{ModelStore, StoreError, DEFAULT_ARTIFACT_PATH};

/// Common result type used at the application boundary
pub type Result<T> = anyhow::Result<T>;
