//! Runtime configuration
//!
//! Read once at start-up from the process environment. A `.env` file in the
//! working directory is loaded first when present.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::speech::SpeechSettings;

pub const DEFAULT_MODEL_PATH: &str = "data/crop_model.json";
pub const DEFAULT_WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub port: u16,
    /// OpenWeatherMap key; `None` means every weather lookup reports no data
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub weather_timeout: Duration,
    pub speech_enabled: bool,
    pub speech_command: String,
    pub speech: SpeechSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            port: 3000,
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_URL.to_string(),
            weather_timeout: Duration::from_secs(10),
            speech_enabled: false,
            speech_command: "espeak".to_string(),
            speech: SpeechSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or empty keys use defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            model_path: get("MODEL_PATH").map(PathBuf::from).unwrap_or(defaults.model_path),
            port: parse_or(get("PORT"), "PORT", defaults.port),
            weather_api_key: get("OPENWEATHER_API_KEY"),
            weather_base_url: get("WEATHER_BASE_URL").unwrap_or(defaults.weather_base_url),
            weather_timeout: Duration::from_secs(parse_or(
                get("WEATHER_TIMEOUT_SECS"),
                "WEATHER_TIMEOUT_SECS",
                defaults.weather_timeout.as_secs(),
            )),
            speech_enabled: get("SPEECH_ENABLED")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(defaults.speech_enabled),
            speech_command: get("SPEECH_COMMAND").unwrap_or(defaults.speech_command),
            speech: SpeechSettings {
                rate: parse_or(get("SPEECH_RATE"), "SPEECH_RATE", defaults.speech.rate),
                volume: parse_or(get("SPEECH_VOLUME"), "SPEECH_VOLUME", defaults.speech.volume),
            },
        }
    }

    /// Log the effective configuration (the API key is never printed)
    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  MODEL_PATH: {}", self.model_path.display());
        tracing::info!("  PORT: {}", self.port);
        tracing::info!(
            "  OPENWEATHER_API_KEY: {}",
            if self.weather_api_key.is_some() { "set" } else { "not set" }
        );
        tracing::info!("  WEATHER_BASE_URL: {}", self.weather_base_url);
        tracing::info!("  SPEECH_ENABLED: {}", self.speech_enabled);
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(value: Option<String>, key: &str, default: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}='{}', using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.model_path, PathBuf::from("data/crop_model.json"));
        assert_eq!(config.port, 3000);
        assert!(config.weather_api_key.is_none());
        assert!(!config.speech_enabled);
        assert_eq!(config.speech.rate, 150);
        assert!((config.speech.volume - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MODEL_PATH", "/opt/models/crop.json"),
            ("PORT", "8080"),
            ("OPENWEATHER_API_KEY", "abc123"),
            ("SPEECH_ENABLED", "true"),
            ("SPEECH_RATE", "120"),
            ("WEATHER_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.model_path, PathBuf::from("/opt/models/crop.json"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.weather_api_key.as_deref(), Some("abc123"));
        assert!(config.speech_enabled);
        assert_eq!(config.speech.rate, 120);
        assert_eq!(config.weather_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("SPEECH_VOLUME", "loud")]);
        assert_eq!(config.port, 3000);
        assert!((config.speech.volume - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = config_from(&[("OPENWEATHER_API_KEY", "   ")]);
        assert!(config.weather_api_key.is_none());
    }
}
