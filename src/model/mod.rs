//! Crop classifier
//!
//! - `features.rs` - readings and the ordered 7-feature input vector
//! - `forest.rs` - JSON decision-forest model, loaded once at start-up

pub mod features;
pub mod forest;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub use features::{
    EnvironmentReading, FeatureVector, NutrientReading, WeatherSample, FEATURE_NAMES,
};
pub use forest::ForestModel;

/// Lower-cased crop name as emitted by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CropLabel(String);

impl CropLabel {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CropLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Anything that can turn a feature vector into a crop recommendation
pub trait CropClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<CropLabel, ClassifierError>;
}

/// Model artifact could not be loaded (fatal at start-up)
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model feature order [{found}] does not match expected [{expected}]")]
    FeatureMismatch { expected: String, found: String },

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

/// Classifier rejected a single request
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("feature '{name}' must be a finite number, got {value}")]
    MalformedFeature { name: &'static str, value: f64 },
}
