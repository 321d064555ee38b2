//! Decision Forest Classifier
//!
//! Read-only ensemble of binary decision trees exported from the training
//! pipeline as JSON. Layout:
//!
//! ```json
//! {
//!   "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
//!   "classes": ["rice", "maize"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 6, "threshold": 150.0, "left": 1, "right": 2 },
//!         { "value": [0.0, 10.0] },
//!         { "value": [12.0, 1.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Split nodes send a sample left when `x[feature] <= threshold`. Leaves hold
//! per-class weights; each tree's leaf is normalized to a distribution and
//! the distributions are averaged across trees.

use std::path::Path;

use serde::Deserialize;

use super::features::{FeatureVector, FEATURE_NAMES};
use super::{ClassifierError, CropClassifier, CropLabel, ModelError};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TreeNode {
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

#[derive(Debug, Clone, Deserialize)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf. Validation guarantees termination.
    fn leaf_for(&self, x: &[f64; 7]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    fn validate(&self, tree_idx: usize, n_classes: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {} has no nodes", tree_idx)));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= FEATURE_NAMES.len() {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {}: feature index {} out of range",
                            tree_idx, idx, feature
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {}: non-finite threshold",
                            tree_idx, idx
                        )));
                    }
                    // Children must come after their parent (no cycles)
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {} node {}: child index {} invalid",
                                tree_idx, idx, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {}: leaf has {} weights, expected {}",
                            tree_idx,
                            idx,
                            value.len(),
                            n_classes
                        )));
                    }
                    let valid_weights = value.iter().all(|w| w.is_finite() && *w >= 0.0);
                    let total: f64 = value.iter().sum();
                    if !valid_weights || total <= 0.0 {
                        return Err(ModelError::Invalid(format!(
                            "tree {} node {}: leaf weights must be non-negative with a positive sum",
                            tree_idx, idx
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

/// Pre-trained crop classifier
#[derive(Debug, Clone)]
pub struct ForestModel {
    classes: Vec<String>,
    trees: Vec<DecisionTree>,
}

impl ForestModel {
    /// Load and validate a model artifact from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_json_str(&contents)?;

        tracing::info!(
            "Loaded crop model from {} ({} trees, {} classes)",
            path.display(),
            model.trees.len(),
            model.classes.len()
        );
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let artifact: ForestArtifact = serde_json::from_str(json)?;

        if artifact.feature_names != FEATURE_NAMES {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_NAMES.join(","),
                found: artifact.feature_names.join(","),
            });
        }
        if artifact.classes.is_empty() {
            return Err(ModelError::Invalid("model has no classes".to_string()));
        }
        if artifact.trees.is_empty() {
            return Err(ModelError::Invalid("model has no trees".to_string()));
        }
        for (idx, tree) in artifact.trees.iter().enumerate() {
            tree.validate(idx, artifact.classes.len())?;
        }

        Ok(Self {
            classes: artifact.classes,
            trees: artifact.trees,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class distribution across trees, aligned with [`Self::classes`]
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        if let Some((name, value)) = features.first_non_finite() {
            return Err(ClassifierError::MalformedFeature { name, value });
        }

        let x = features.as_array();
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf_for(x);
            let sum: f64 = leaf.iter().sum();
            for (total, weight) in totals.iter_mut().zip(leaf) {
                *total += weight / sum;
            }
        }

        let n = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n).collect())
    }
}

impl CropClassifier for ForestModel {
    fn predict(&self, features: &FeatureVector) -> Result<CropLabel, ClassifierError> {
        let proba = self.predict_proba(features)?;

        // Ties resolve to the lowest class index
        let mut best = 0;
        for (idx, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = idx;
            }
        }

        Ok(CropLabel::new(&self.classes[best]))
    }
}
