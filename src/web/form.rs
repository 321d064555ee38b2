//! Advisory form input
//!
//! Shared by the HTML form (url-encoded, empty fields allowed) and the JSON
//! API (numbers). Bounds mirror the form widgets: N/P/K and rainfall are
//! non-negative, pH is 0-14.

use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

use crate::flow::{AdvisoryInput, WeatherStatus};
use crate::model::features::{DEFAULT_PH, DEFAULT_RAINFALL_MM};
use crate::model::{EnvironmentReading, NutrientReading, WeatherSample};
use crate::weather::WeatherProvider;

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        min: f64,
        value: f64,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvisoryForm {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub nitrogen: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub phosphorus: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub potassium: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub rainfall: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept JSON numbers, numeric strings, and blank strings (as `None`)
fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("'{}' is not a number", s))),
    }
}

fn at_least(field: &'static str, value: Option<f64>, min: f64) -> Result<(), FormError> {
    match value {
        Some(v) if v < min => Err(FormError::BelowMinimum { field, min, value: v }),
        _ => Ok(()),
    }
}

impl AdvisoryForm {
    /// Trimmed, non-empty city name
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    pub fn validate(&self) -> Result<(), FormError> {
        at_least("nitrogen", self.nitrogen, 0.0)?;
        at_least("phosphorus", self.phosphorus, 0.0)?;
        at_least("potassium", self.potassium, 0.0)?;
        at_least("rainfall", self.rainfall, 0.0)?;

        if let Some(ph) = self.ph {
            if !(0.0..=14.0).contains(&ph) {
                return Err(FormError::OutOfRange {
                    field: "ph",
                    min: 0.0,
                    max: 14.0,
                    value: ph,
                });
            }
        }

        Ok(())
    }

    /// Weather status for this form: looked up only when a city is given
    pub async fn lookup_weather(&self, provider: &dyn WeatherProvider) -> WeatherStatus {
        match self.city() {
            Some(city) => WeatherStatus::from_lookup(provider.fetch(city).await),
            None => WeatherStatus::NotRequested,
        }
    }

    /// Resolve the form into a complete advisory input.
    ///
    /// Temperature and humidity come from the form when entered, else from
    /// the live weather sample, else from the defaults (25 °C / 50 %).
    pub fn into_input(self, weather_status: WeatherStatus) -> Result<AdvisoryInput, FormError> {
        self.validate()?;

        let fallback = WeatherSample::or_defaults(weather_status.sample());
        Ok(AdvisoryInput {
            nutrients: NutrientReading {
                nitrogen: self.nitrogen.unwrap_or(0.0),
                phosphorus: self.phosphorus.unwrap_or(0.0),
                potassium: self.potassium.unwrap_or(0.0),
            },
            weather: WeatherSample {
                temperature: self.temperature.unwrap_or(fallback.temperature),
                humidity: self.humidity.unwrap_or(fallback.humidity),
            },
            environment: EnvironmentReading {
                ph: self.ph.unwrap_or(DEFAULT_PH),
                rainfall: self.rainfall.unwrap_or(DEFAULT_RAINFALL_MM),
            },
            weather_status,
        })
    }
}
