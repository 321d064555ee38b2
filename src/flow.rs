//! Advisory Flow
//!
//! One user action runs one straight pass:
//! `Idle → InputCollected → Predicted → AdviceRendered → Terminal`.
//!
//! This module holds the pure part of that pass (classifier call plus the
//! table lookups). Collecting weather and speaking the result are side
//! effects handled by the caller around [`run_advisory`].

use serde::Serialize;
use thiserror::Error;

use crate::advisory::{
    advise, details_for, normalize, tips_for, CropKey, CropKnowledgeEntry, FertilizerAdvice,
};
use crate::model::{
    ClassifierError, CropClassifier, CropLabel, EnvironmentReading, FeatureVector,
    NutrientReading, WeatherSample,
};

/// Position in the per-request pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Idle,
    InputCollected,
    Predicted,
    AdviceRendered,
    Terminal,
}

/// Where the temperature/humidity used for prediction came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherStatus {
    /// No city given; defaults or user-entered values apply
    NotRequested,
    /// Live sample from the weather provider
    Live(WeatherSample),
    /// Lookup failed; defaults apply
    Unavailable,
}

impl WeatherStatus {
    pub fn from_lookup(sample: Option<WeatherSample>) -> Self {
        match sample {
            Some(s) => WeatherStatus::Live(s),
            None => WeatherStatus::Unavailable,
        }
    }

    pub fn sample(&self) -> Option<WeatherSample> {
        match self {
            WeatherStatus::Live(s) => Some(*s),
            _ => None,
        }
    }

    /// Banner text for the user, if any
    pub fn message(&self) -> Option<String> {
        match self {
            WeatherStatus::NotRequested => None,
            WeatherStatus::Live(s) => Some(format!(
                "🌡 Temperature: {}°C  |  💧 Humidity: {}%",
                s.temperature, s.humidity
            )),
            WeatherStatus::Unavailable => Some(
                "❌ Failed to fetch weather data. Check city name or API key.".to_string(),
            ),
        }
    }
}

/// Everything collected from the user for one request
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryInput {
    pub nutrients: NutrientReading,
    pub weather: WeatherSample,
    pub environment: EnvironmentReading,
    pub weather_status: WeatherStatus,
}

impl AdvisoryInput {
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(&self.nutrients, &self.weather, &self.environment)
    }
}

/// Result of the pure part of the flow
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryReport {
    pub crop_label: CropLabel,
    pub crop_key: CropKey,
    pub display_name: String,
    pub features: FeatureVector,
    pub fertilizer: FertilizerAdvice,
    pub tips: &'static str,
    pub details: Option<&'static CropKnowledgeEntry>,
}

impl AdvisoryReport {
    /// Text to hand to the speech synthesizer, in presentation order
    pub fn narration(&self) -> Vec<String> {
        vec![
            format!("The recommended crop is {}", self.crop_label),
            self.fertilizer.to_speech(),
            self.tips.to_string(),
        ]
    }
}

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("crop prediction failed: {0}")]
    Prediction(#[from] ClassifierError),
}

/// Run normalizer, advisor, tips and knowledge-base lookups for a label
pub fn render_advice(
    label: CropLabel,
    nutrients: &NutrientReading,
    features: FeatureVector,
) -> AdvisoryReport {
    let crop_key = normalize(label.as_str());
    let fertilizer = advise(nutrients.nitrogen, nutrients.phosphorus, nutrients.potassium);
    let tips = tips_for(crop_key.as_str());
    let details = details_for(crop_key.as_str());

    AdvisoryReport {
        display_name: crop_key.display_name(),
        crop_label: label,
        crop_key,
        features,
        fertilizer,
        tips,
        details,
    }
}

/// Predict a crop for the collected input and build the advisory report.
///
/// A classifier error ends the request; no partial report is produced.
pub fn run_advisory(
    classifier: &dyn CropClassifier,
    input: &AdvisoryInput,
) -> Result<AdvisoryReport, AdvisoryError> {
    tracing::debug!(stage = ?FlowStage::InputCollected, "weather: {:?}", input.weather_status);

    let features = input.features();
    let label = classifier.predict(&features)?;
    tracing::debug!(stage = ?FlowStage::Predicted, "classifier predicted '{}'", label);

    let report = render_advice(label, &input.nutrients, features);
    tracing::debug!(
        stage = ?FlowStage::AdviceRendered,
        "crop key '{}', {} fertilizer line(s), details: {}",
        report.crop_key,
        report.fertilizer.lines().len(),
        report.details.is_some()
    );
    tracing::debug!(stage = ?FlowStage::Terminal, "advisory for '{}' complete", report.crop_key);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Returns a fixed label and records what it was asked
    struct FixedClassifier {
        label: &'static str,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl FixedClassifier {
        fn new(label: &'static str) -> Self {
            Self { label, seen: Mutex::new(Vec::new()) }
        }
    }

    impl CropClassifier for FixedClassifier {
        fn predict(&self, features: &FeatureVector) -> Result<CropLabel, ClassifierError> {
            self.seen.lock().unwrap().push(*features);
            Ok(CropLabel::new(self.label))
        }
    }

    struct FailingClassifier;

    impl CropClassifier for FailingClassifier {
        fn predict(&self, _: &FeatureVector) -> Result<CropLabel, ClassifierError> {
            Err(ClassifierError::MalformedFeature { name: "N", value: f64::NAN })
        }
    }

    fn sample_input() -> AdvisoryInput {
        AdvisoryInput {
            nutrients: NutrientReading { nitrogen: 90.0, phosphorus: 42.0, potassium: 43.0 },
            weather: WeatherSample { temperature: 20.5, humidity: 80.0 },
            environment: EnvironmentReading { ph: 6.5, rainfall: 200.0 },
            weather_status: WeatherStatus::NotRequested,
        }
    }

    #[test]
    fn test_end_to_end_with_synonym() {
        let classifier = FixedClassifier::new("Groundnut");
        let report = run_advisory(&classifier, &sample_input()).unwrap();

        assert_eq!(report.crop_label.as_str(), "groundnut");
        assert_eq!(report.crop_key.as_str(), "ground nuts");
        assert_eq!(report.display_name, "Ground Nuts");
        assert!(report.fertilizer.is_optimal());
        assert!(report.tips.contains("gypsum"));
        assert_eq!(report.details.unwrap().crop, "ground nuts");

        let seen = classifier.seen.lock().unwrap();
        assert_eq!(seen[0].as_array(), &[90.0, 42.0, 43.0, 20.5, 80.0, 6.5, 200.0]);
    }

    #[test]
    fn test_unknown_crop_uses_sentinels() {
        let classifier = FixedClassifier::new("kidneybeans");
        let report = run_advisory(&classifier, &sample_input()).unwrap();

        assert_eq!(report.tips, crate::advisory::NO_TIPS_MESSAGE);
        assert!(report.details.is_none());
    }

    #[test]
    fn test_pulses_have_details_but_no_tips() {
        let report = run_advisory(&FixedClassifier::new("pulse"), &sample_input()).unwrap();
        assert_eq!(report.crop_key.as_str(), "pulses");
        assert_eq!(report.tips, crate::advisory::NO_TIPS_MESSAGE);
        assert!(report.details.is_some());
    }

    #[test]
    fn test_classifier_failure_is_fatal() {
        let err = run_advisory(&FailingClassifier, &sample_input()).unwrap_err();
        assert!(matches!(err, AdvisoryError::Prediction(_)));
    }

    #[test]
    fn test_narration_order() {
        let mut input = sample_input();
        input.nutrients.nitrogen = 10.0;
        let report = run_advisory(&FixedClassifier::new("rice"), &input).unwrap();

        let lines = report.narration();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "The recommended crop is rice");
        assert_eq!(lines[1], "Nitrogen is low. Use Urea or Ammonium Sulphate.");
        assert_eq!(lines[2], tips_for("rice"));
    }

    /// Collects formatted log output in memory
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stage_transitions_logged_through_terminal() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            run_advisory(&FixedClassifier::new("rice"), &sample_input()).unwrap();
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let stages: Vec<usize> = ["InputCollected", "Predicted", "AdviceRendered", "Terminal"]
            .iter()
            .map(|stage| {
                logs.find(&format!("stage={}", stage))
                    .unwrap_or_else(|| panic!("missing stage {} in {}", stage, logs))
            })
            .collect();
        assert!(stages.windows(2).all(|w| w[0] < w[1]), "stages out of order: {}", logs);
    }

    #[test]
    fn test_failed_prediction_never_reaches_terminal() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(run_advisory(&FailingClassifier, &sample_input()).is_err());
        });

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(!logs.contains("stage=Terminal"));
    }

    #[test]
    fn test_weather_status_messages() {
        assert!(WeatherStatus::NotRequested.message().is_none());
        assert!(WeatherStatus::Unavailable.message().unwrap().contains("Failed to fetch"));

        let live = WeatherStatus::from_lookup(Some(WeatherSample { temperature: 31.5, humidity: 70.0 }));
        assert_eq!(live.message().unwrap(), "🌡 Temperature: 31.5°C  |  💧 Humidity: 70%");
        assert_eq!(WeatherStatus::from_lookup(None), WeatherStatus::Unavailable);
    }
}
