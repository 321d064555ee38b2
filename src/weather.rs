//! Weather lookup
//!
//! Current temperature and humidity for a city from OpenWeatherMap. Any
//! failure (unknown city, bad or missing key, network error, unexpected
//! body) is reported as "no data" so the caller can fall back to defaults.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::WeatherSample;

/// Source of live weather readings
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions for `city`, or `None` when unavailable
    async fn fetch(&self, city: &str) -> Option<WeatherSample>;
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("no weather API key configured")]
    MissingApiKey,

    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather service returned {0}")]
    Status(StatusCode),
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainReadings,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

/// OpenWeatherMap "current weather" client (metric units)
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(concat!("crop_advisor_rust/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, WeatherError> {
        Self::new(
            config.weather_base_url.clone(),
            config.weather_api_key.clone(),
            config.weather_timeout,
        )
    }

    /// Like [`WeatherProvider::fetch`] but keeps the failure reason
    pub async fn try_fetch(&self, city: &str) -> Result<WeatherSample, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;

        tracing::debug!("Fetching weather for '{}'", city);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status()));
        }

        let body: CurrentWeather = response.json().await?;
        Ok(WeatherSample {
            temperature: body.main.temp,
            humidity: body.main.humidity,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Option<WeatherSample> {
        match self.try_fetch(city).await {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::warn!("Weather lookup for '{}' failed: {}", city, e);
                None
            }
        }
    }
}

/// Provider that never has data (weather lookups disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWeather;

#[async_trait]
impl WeatherProvider for NoWeather {
    async fn fetch(&self, _city: &str) -> Option<WeatherSample> {
        None
    }
}
