//! Animal classification inference
//!
//! Loads a pre-trained classifier and its class mapping once, then turns
//! [`FeatureRecord`]s into labelled predictions with a confidence score.

pub mod artifacts;
pub mod classifier;
pub mod error;
pub mod features;
pub mod forest;
pub mod linear;
pub mod mapping;
pub mod ml;
pub mod prediction;

#[cfg(test)]
mod tests;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use classifier::{Classifier, Distribution};
pub use error::{ArtifactError, FormError, PredictError};
pub use features::{FEATURES, FeatureKind, FeatureRecord, FeatureSpec};
pub use mapping::ClassMapping;
pub use ml::*;
pub use prediction::{MLPrediction, format_confidence, predict};
