//! Inference over a loaded model bundle

use crate::model::{ModelBundle, ModelError};
use clap::ValueEnum;
use log::debug;
use ndarray::Array1;
use std::fmt;
use thiserror::Error;

/// Customer gender, encoded for the model as Male=1, Female=0
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn encoded(self) -> f64 {
        match self {
            Gender::Male => 1.0,
            Gender::Female => 0.0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        })
    }
}

/// One customer's attributes for a single prediction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInput {
    pub gender: Gender,
    /// Age in years, 18 to 80
    pub age: u32,
    /// Annual income in thousands, 10 to 150
    pub annual_income: u32,
    /// Spending score, 1 to 100
    pub spending_score: u32,
}

impl CustomerInput {
    /// Encode the attributes in the fixed order the model was fitted with:
    /// gender, age, annual income, spending score
    pub fn to_features(&self) -> Array1<f64> {
        Array1::from_vec(vec![
            self.gender.encoded(),
            f64::from(self.age),
            f64::from(self.annual_income),
            f64::from(self.spending_score),
        ])
    }
}

/// Errors raised while scoring a customer against the bundle
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("failed to scale input features: {0}")]
    ScalingFailure(ModelError),

    #[error("prediction failed: {0}")]
    PredictionFailure(String),
}

/// Cluster assignment with distances to every cluster center
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Assigned cluster label
    pub cluster: usize,
    /// max(distances) / sum(distances); a dispersion ratio, not a probability
    pub confidence: f64,
    /// Distance to each cluster center, ordered by cluster index
    pub distances: Vec<f64>,
}

/// Score one customer against the loaded bundle.
///
/// Encodes the input, scales it with the bundle's fitted scaler, assigns the
/// nearest cluster, and reports the distance to every center. Scaling
/// problems surface as `ScalingFailure`, everything downstream as
/// `PredictionFailure`; nothing is retried.
pub fn predict(bundle: &ModelBundle, input: &CustomerInput) -> Result<Prediction, PredictError> {
    let features = input.to_features();
    debug!("encoded feature vector: {:?}", features);

    let scaled = bundle
        .scaler
        .transform(&features)
        .map_err(PredictError::ScalingFailure)?;

    let cluster = bundle
        .model
        .predict(&scaled)
        .map_err(|e| PredictError::PredictionFailure(e.to_string()))?;
    let distances = bundle
        .model
        .transform(&scaled)
        .map_err(|e| PredictError::PredictionFailure(e.to_string()))?
        .to_vec();

    let confidence = confidence(&distances)?;
    debug!(
        "assigned cluster {} with confidence {:.4}",
        cluster, confidence
    );

    Ok(Prediction {
        cluster,
        confidence,
        distances,
    })
}

/// Ratio of the largest center distance to the total distance sum
fn confidence(distances: &[f64]) -> Result<f64, PredictError> {
    let sum: f64 = distances.iter().sum();
    let max = distances.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    let ratio = max / sum;
    if !ratio.is_finite() {
        return Err(PredictError::PredictionFailure(format!(
            "confidence undefined for center distances summing to {sum}"
        )));
    }

    Ok(ratio)
}
