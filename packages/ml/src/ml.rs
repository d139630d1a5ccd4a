//! Serialized classifier models
//!
//! A classifier artifact is one JSON document holding an [`MLModel`]. The `type` tag picks
//! the model family; every family carries the same [`ModelWithMeta`] envelope so the
//! class list and expected feature columns can be checked before the model is used.

use crate::classifier::{Classifier, Distribution, argmax};
use crate::features::{FeatureRecord, N_FEATURES, feature_names};
use crate::forest::RandomForest;
use crate::linear::LogisticRegression;
use fauna_types::{Result, anyhow, bail, json};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// # Model attached with the metadata needed to serve it
pub struct ModelWithMeta<M> {
    pub model: M,
    /// Class numbers in the order of the model's output columns
    pub classes: Vec<usize>,
    /// Column names the model was trained on, in order
    pub feature_names: Vec<String>,
}

impl<M> ModelWithMeta<M> {
    fn validate_meta(&self) -> Result<()> {
        if self.classes.is_empty() {
            bail!("model declares no classes");
        }
        let unique: HashSet<_> = self.classes.iter().collect();
        if unique.len() != self.classes.len() {
            bail!("model declares duplicate classes: {:?}", self.classes);
        }
        let expected: Vec<&str> = feature_names().collect();
        let actual: Vec<&str> = self.feature_names.iter().map(String::as_str).collect();
        if actual != expected {
            bail!(
                "feature columns {:?} do not match the expected columns {:?}",
                actual,
                expected
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
/// # Unified type for the supported classifier families
pub enum MLModel {
    RandomForest(ModelWithMeta<RandomForest>),
    LogisticRegression(ModelWithMeta<LogisticRegression>),
}

impl fmt::Display for MLModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MLModel::RandomForest(m) => write!(
                f,
                "Random Forest Classification ({} trees)",
                m.model.trees.len()
            ),
            MLModel::LogisticRegression(_) => write!(f, "Logistic Regression Classification"),
        }
    }
}

impl MLModel {
    /// Parse and validate a classifier artifact.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let model: MLModel = json::from_slice(bytes)?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>> {
        Ok(json::to_vec(&self)?)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            MLModel::RandomForest(m) => {
                m.validate_meta()?;
                m.model.validate(N_FEATURES, m.classes.len())
            }
            MLModel::LogisticRegression(m) => {
                m.validate_meta()?;
                m.model.validate(N_FEATURES, m.classes.len())
            }
        }
    }

    fn proba_array(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        let x = record.to_vector();
        match self {
            MLModel::RandomForest(m) => m.model.predict_proba(x.view()),
            MLModel::LogisticRegression(m) => m.model.predict_proba(x.view()),
        }
    }
}

impl Classifier for MLModel {
    fn classes(&self) -> &[usize] {
        match self {
            MLModel::RandomForest(m) => &m.classes,
            MLModel::LogisticRegression(m) => &m.classes,
        }
    }

    fn predict(&self, record: &FeatureRecord) -> Result<usize> {
        let proba = self.proba_array(record)?.to_vec();
        let best = argmax(&proba).ok_or_else(|| anyhow!("Got an empty prediction"))?;
        self.classes().get(best).copied().ok_or_else(|| {
            anyhow!(
                "Output column {} has no class among {:?}",
                best,
                self.classes()
            )
        })
    }

    fn predict_proba(&self, record: &FeatureRecord) -> Result<Distribution> {
        Ok(self.proba_array(record)?.to_vec())
    }
}
