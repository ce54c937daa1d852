//! Gradient-boosted tree model wrapper.
//!
//! The artifact is produced by the offline training pipeline and is opaque
//! here beyond its JSON layout: a feature name list, a base margin, and an
//! array of trees whose nodes either split on a feature or carry a leaf
//! value. Traversal goes left when `value < threshold`. The raw score is
//! the sigmoid of the accumulated margin, oriented as probability of
//! default — higher means riskier.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use super::features::{FeatureVector, FEATURE_SCHEMA};

/// Errors raised while loading or validating a model artifact. All of them
/// are fatal at startup; none occur per request.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model expects feature '{expected}' at position {position}, schema has '{found}'")]
    SchemaMismatch {
        position: usize,
        expected: String,
        found: String,
    },
    #[error("model feature count {found} does not match schema length {expected}")]
    SchemaLength { expected: usize, found: usize },
    #[error("model has no trees")]
    Empty,
    #[error("malformed tree {tree}: {reason}")]
    MalformedTree { tree: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    #[allow(dead_code)]
    version: String,
    feature_names: Vec<String>,
    base_score: f64,
    trees: Vec<DecisionTree>,
}

#[derive(Debug, Deserialize)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Loaded, validated scoring model. Stateless at call time: `score` takes
/// `&self` and repeated calls with identical input return identical output.
#[derive(Debug)]
pub struct GradientBoostedModel {
    base_score: f64,
    trees: Vec<DecisionTree>,
}

impl GradientBoostedModel {
    /// Load and validate an artifact from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Load with a bounded number of attempts before giving up. This is the
    /// only retried operation in the engine; everything at inference time
    /// fails once and surfaces to the caller.
    pub fn load_with_retries(
        path: impl AsRef<Path>,
        attempts: u32,
    ) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let attempts = attempts.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match Self::from_path(path) {
                Ok(model) => return Ok(model),
                Err(err) => {
                    warn!(%err, attempt, attempts, "model load failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.expect("at least one load attempt"))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        Self::validate(&artifact)?;
        Ok(Self {
            base_score: artifact.base_score,
            trees: artifact.trees,
        })
    }

    fn validate(artifact: &ModelArtifact) -> Result<(), ModelLoadError> {
        if artifact.feature_names.len() != FEATURE_SCHEMA.len() {
            return Err(ModelLoadError::SchemaLength {
                expected: FEATURE_SCHEMA.len(),
                found: artifact.feature_names.len(),
            });
        }
        for (position, (expected, found)) in artifact
            .feature_names
            .iter()
            .zip(FEATURE_SCHEMA.iter())
            .enumerate()
        {
            if expected != found {
                return Err(ModelLoadError::SchemaMismatch {
                    position,
                    expected: expected.clone(),
                    found: (*found).to_string(),
                });
            }
        }
        if artifact.trees.is_empty() {
            return Err(ModelLoadError::Empty);
        }
        for (index, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelLoadError::MalformedTree {
                    tree: index,
                    reason: "empty node list".to_string(),
                });
            }
            for (node_index, node) in tree.nodes.iter().enumerate() {
                if let TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } = node
                {
                    if *feature >= FEATURE_SCHEMA.len() {
                        return Err(ModelLoadError::MalformedTree {
                            tree: index,
                            reason: format!("feature index {feature} out of range"),
                        });
                    }
                    // Children must point forward so traversal terminates.
                    if *left <= node_index || *right <= node_index {
                        return Err(ModelLoadError::MalformedTree {
                            tree: index,
                            reason: format!("backward child edge at node {node_index}"),
                        });
                    }
                    if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                        return Err(ModelLoadError::MalformedTree {
                            tree: index,
                            reason: format!("child index out of range at node {node_index}"),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Raw risk score in [0, 1] for a transformed application.
    pub fn score(&self, vector: &FeatureVector) -> f64 {
        let values = vector.values();
        let mut margin = self.base_score;
        for tree in &self.trees {
            margin += evaluate_tree(tree, values);
        }
        sigmoid(margin).clamp(0.0, 1.0)
    }
}

fn evaluate_tree(tree: &DecisionTree, values: &[f64]) -> f64 {
    let mut cursor = 0;
    loop {
        match &tree.nodes[cursor] {
            TreeNode::Leaf { value } => return *value,
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = values.get(*feature).copied().unwrap_or(0.0);
                cursor = if value < *threshold { *left } else { *right };
            }
        }
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}
