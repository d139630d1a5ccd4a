//! Turning a feature record into a labelled prediction

use crate::artifacts::Artifacts;
use crate::error::PredictError;
use crate::features::FeatureRecord;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Allowed deviation of a probability distribution's sum from 1.0.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct ClassProbability {
    pub class_number: usize,
    pub probability: f64,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
pub struct MLPrediction {
    /// Class number emitted by the classifier
    pub class_number: usize,
    /// Human readable class name from the class mapping
    pub label: String,
    /// Highest probability in the predicted distribution (0.0-1.0)
    pub confidence: f64,
    /// Full distribution, one entry per class the model knows
    pub probabilities: Vec<ClassProbability>,
}

impl MLPrediction {
    pub fn success_message(&self) -> String {
        format!("Predicted Animal Class: {}", self.label)
    }

    pub fn confidence_message(&self) -> String {
        format!("Prediction Confidence: {}", format_confidence(self.confidence))
    }
}

/// Fixed-point rendering with two decimals, e.g. `0.94`.
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.2}")
}

pub fn predict(artifacts: &Artifacts, record: &FeatureRecord) -> Result<MLPrediction, PredictError> {
    record.validate()?;
    let classifier = artifacts.classifier();

    let class_number = classifier.predict(record)?;
    let distribution = classifier.predict_proba(record)?;
    let confidence = max_probability(&distribution)?;

    let label = artifacts.class_map().label(class_number)?.to_string();

    let probabilities = classifier
        .classes()
        .iter()
        .zip(distribution.iter())
        .map(|(class_number, probability)| ClassProbability {
            class_number: *class_number,
            probability: *probability,
        })
        .collect();

    tracing::debug!(class_number, %label, confidence, "Prediction complete");

    Ok(MLPrediction {
        class_number,
        label,
        confidence,
        probabilities,
    })
}

/// Maximum of a distribution after checking it is one.
pub fn max_probability(distribution: &[f64]) -> Result<f64, PredictError> {
    if distribution.is_empty() {
        return Err(PredictError::InvalidDistribution(
            "distribution is empty".to_string(),
        ));
    }
    if let Some(p) = distribution
        .iter()
        .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0 + DISTRIBUTION_TOLERANCE)
    {
        return Err(PredictError::InvalidDistribution(format!(
            "probability {p} is outside [0, 1]"
        )));
    }
    let total: f64 = distribution.iter().sum();
    if (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
        return Err(PredictError::InvalidDistribution(format!(
            "probabilities sum to {total}"
        )));
    }
    Ok(distribution.iter().copied().fold(0.0, f64::max))
}
