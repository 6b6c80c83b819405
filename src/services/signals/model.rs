//! Classifier capability and the artifacts that provide it.
//!
//! The predictor never trains anything. It asks a [`ModelSource`] once for
//! the bundle matching its configured version and scores with whatever comes
//! back, if anything.

use crate::types::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while loading or running a model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid model: {0}")]
    Invalid(String),
}

/// A trained classifier over the feature catalog.
pub trait Classifier: Send + Sync {
    /// Predicted class label (+1 long, -1 short, anything else neutral).
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError>;

    /// Per-class probabilities.
    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Short model family name, reported on signals.
    fn kind(&self) -> &str;
}

/// Feature preprocessing applied before the classifier.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// A loaded classifier plus its optional scaler.
#[derive(Clone)]
pub struct ModelBundle {
    pub version: String,
    pub classifier: Arc<dyn Classifier>,
    pub scaler: Option<Arc<dyn FeatureScaler>>,
}

impl fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBundle")
            .field("version", &self.version)
            .field("classifier", &self.classifier.kind())
            .field("scaler", &self.scaler.is_some())
            .finish()
    }
}

/// Resolves a model version to a bundle.
///
/// `Ok(None)` means no artifact exists for that version, which is a normal
/// state and sends the predictor down the rule-based path.
pub trait ModelSource: Send + Sync {
    fn load(&self, version: &str) -> Result<Option<ModelBundle>, ModelError>;
}

/// Source that never has a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModelSource;

impl ModelSource for NoModelSource {
    fn load(&self, _version: &str) -> Result<Option<ModelBundle>, ModelError> {
        Ok(None)
    }
}

/// Loads JSON artifacts from a directory:
/// `model_v{version}.json` (required) and `scaler_v{version}.json` (optional).
#[derive(Debug, Clone)]
pub struct FileModelSource {
    dir: PathBuf,
}

impl FileModelSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self, version: &str) -> PathBuf {
        self.dir.join(format!("model_v{}.json", version))
    }

    pub fn scaler_path(&self, version: &str) -> PathBuf {
        self.dir.join(format!("scaler_v{}.json", version))
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ModelError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ModelSource for FileModelSource {
    fn load(&self, version: &str) -> Result<Option<ModelBundle>, ModelError> {
        let model_path = self.model_path(version);
        if !model_path.is_file() {
            return Ok(None);
        }

        let classifier: LinearClassifier = Self::read_json(&model_path)?;
        classifier.validate(FEATURE_COUNT)?;

        let scaler_path = self.scaler_path(version);
        let scaler = if scaler_path.is_file() {
            let scaler: StandardScaler = Self::read_json(&scaler_path)?;
            scaler.validate(FEATURE_COUNT)?;
            Some(Arc::new(scaler) as Arc<dyn FeatureScaler>)
        } else {
            None
        };

        Ok(Some(ModelBundle {
            version: version.to_string(),
            classifier: Arc::new(classifier),
            scaler,
        }))
    }
}

/// Linear classifier with one coefficient row per class.
///
/// Probabilities come from a softmax over the per-class decision values. A
/// two-class model may instead carry a single row, scored with the logistic
/// function against the second class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    /// Check the artifact is internally consistent and sized for `n_features`.
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("no classes".to_string()));
        }

        let binary = self.classes.len() == 2 && self.coefficients.len() == 1;
        let expected_rows = if binary { 1 } else { self.classes.len() };
        if self.coefficients.len() != expected_rows {
            return Err(ModelError::Invalid(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                self.classes.len()
            )));
        }
        if self.intercepts.len() != expected_rows {
            return Err(ModelError::Invalid(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                expected_rows
            )));
        }

        for row in &self.coefficients {
            if row.len() != n_features {
                return Err(ModelError::DimensionMismatch {
                    expected: n_features,
                    got: row.len(),
                });
            }
        }

        Ok(())
    }

    fn decision_values(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                if row.len() != features.len() {
                    return Err(ModelError::DimensionMismatch {
                        expected: row.len(),
                        got: features.len(),
                    });
                }
                Ok(row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + intercept)
            })
            .collect()
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f64]) -> Result<i64, ModelError> {
        let probabilities = self.predict_proba(features)?;
        let best = probabilities
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best });
        self.classes
            .get(best.0)
            .copied()
            .ok_or_else(|| ModelError::Invalid("no classes".to_string()))
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        let decisions = self.decision_values(features)?;
        if self.classes.len() == 2 && decisions.len() == 1 {
            let positive = 1.0 / (1.0 + (-decisions[0]).exp());
            return Ok(vec![1.0 - positive, positive]);
        }
        Ok(softmax(&decisions))
    }

    fn kind(&self) -> &str {
        "linear"
    }
}

/// Numerically stable softmax; uniform if every exponent underflows.
pub fn softmax(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_values: Vec<f64> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exp_values.iter().sum();

    if sum == 0.0 || !sum.is_finite() {
        return vec![1.0 / values.len() as f64; values.len()];
    }

    exp_values.iter().map(|&v| v / sum).collect()
}

/// Standardizes each feature as `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        for len in [self.mean.len(), self.scale.len()] {
            if len != n_features {
                return Err(ModelError::DimensionMismatch {
                    expected: n_features,
                    got: len,
                });
            }
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.mean.len() || features.len() != self.scale.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                got: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Constant training columns are stored with scale 0.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
