//! Tree ensemble classifier
//!
//! Trees are stored as flat node arrays. A split sends a row left when
//! `x[feature] <= threshold`, which matches how most exporters write thresholds.
//! Leaves hold per-class weights (sample counts or fractions); each tree votes with its
//! normalised leaf and the forest averages the votes.

use fauna_types::{Result, anyhow, bail};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Check that every walk terminates at a well-formed leaf.
    ///
    /// Children must sit after their parent in `nodes`, so a walk can never revisit a node.
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        if self.nodes.is_empty() {
            bail!("tree has no nodes");
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        bail!("node {idx}: feature index {feature} out of range (< {n_features})");
                    }
                    if !threshold.is_finite() {
                        bail!("node {idx}: threshold is not finite");
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            bail!("node {idx}: child index {child} is invalid");
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        bail!(
                            "node {idx}: leaf has {} weights, expected {n_classes}",
                            value.len()
                        );
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        bail!("node {idx}: leaf weights must be finite and non-negative");
                    }
                    let total = value.iter().sum::<f64>();
                    if total <= 0.0 {
                        bail!("node {idx}: leaf weights sum to zero");
                    }
                    if !total.is_finite() {
                        bail!("node {idx}: leaf weights overflow");
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, x: ArrayView1<f64>) -> Result<&[f64]> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x
                        .get(*feature)
                        .ok_or_else(|| anyhow!("feature index {feature} out of range"))?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return Ok(value),
                None => bail!("node index {idx} out of range"),
            }
        }
    }

    pub fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        let weights = Array1::from(self.leaf(x)?.to_vec());
        let total = weights.sum();
        Ok(weights / total)
    }
}

/// Averaged ensemble of [`DecisionTree`]s. A single tree is a forest of one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self, n_features: usize, n_classes: usize) -> Result<()> {
        if self.trees.is_empty() {
            bail!("forest has no trees");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features, n_classes)
                .map_err(|e| anyhow!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    pub fn predict_proba(&self, x: ArrayView1<f64>) -> Result<Array1<f64>> {
        let mut acc: Option<Array1<f64>> = None;
        for tree in &self.trees {
            let proba = tree.predict_proba(x)?;
            acc = Some(match acc {
                Some(sum) => sum + proba,
                None => proba,
            });
        }
        let sum = acc.ok_or_else(|| anyhow!("forest has no trees"))?;
        Ok(sum / self.trees.len() as f64)
    }
}
