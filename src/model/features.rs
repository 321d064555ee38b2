//! Classifier inputs
//!
//! The model was trained on a fixed positional layout:
//! `[N, P, K, temperature, humidity, ph, rainfall]`. `FeatureVector` is the
//! only way to build that array, so the order cannot drift.

use serde::{Deserialize, Serialize};

/// Feature names in training order
pub const FEATURE_NAMES: [&str; 7] = [
    "N",
    "P",
    "K",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

pub const DEFAULT_TEMPERATURE_C: f64 = 25.0;
pub const DEFAULT_HUMIDITY_PCT: f64 = 50.0;
pub const DEFAULT_PH: f64 = 6.5;
pub const DEFAULT_RAINFALL_MM: f64 = 100.0;

/// Soil nutrient levels (kg/ha)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientReading {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

/// Current weather at the user's location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%)
    pub humidity: f64,
}

impl WeatherSample {
    /// Temperature/humidity to use when no live sample is available
    pub fn defaults() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE_C,
            humidity: DEFAULT_HUMIDITY_PCT,
        }
    }

    pub fn or_defaults(sample: Option<WeatherSample>) -> Self {
        sample.unwrap_or_else(Self::defaults)
    }
}

/// Soil pH and rainfall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    pub ph: f64,
    /// Rainfall (mm)
    pub rainfall: f64,
}

impl Default for EnvironmentReading {
    fn default() -> Self {
        Self {
            ph: DEFAULT_PH,
            rainfall: DEFAULT_RAINFALL_MM,
        }
    }
}

/// Ordered classifier input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; 7]);

impl FeatureVector {
    pub fn new(
        nutrients: &NutrientReading,
        weather: &WeatherSample,
        environment: &EnvironmentReading,
    ) -> Self {
        Self([
            nutrients.nitrogen,
            nutrients.phosphorus,
            nutrients.potassium,
            weather.temperature,
            weather.humidity,
            environment.ph,
            environment.rainfall,
        ])
    }

    pub fn from_array(values: [f64; 7]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; 7] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// First non-finite value, as `(feature name, value)`
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        self.0
            .iter()
            .zip(FEATURE_NAMES)
            .find(|(v, _)| !v.is_finite())
            .map(|(v, name)| (name, *v))
    }
}
