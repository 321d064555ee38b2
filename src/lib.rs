//! Crop Advisor
//!
//! Recommends a crop from soil nutrients and weather using a pre-trained
//! decision forest, then explains it with rule-based fertilizer advice,
//! crop-care tips and ideal growing conditions.
//!
//! - `advisory/`: Fixed lookup tables (fertilizer rules, tips, knowledge base, name synonyms)
//! - `model/`: Feature vector and the JSON decision-forest classifier
//! - `flow`: Per-request pipeline from collected input to advisory report
//! - `speech`: Optional spoken output
//! - `config`: Environment-driven settings
//! - `weather`, `web/`, `api_server` (feature `api`): OpenWeatherMap client and the axum front end

pub mod advisory;
pub mod config;
pub mod flow;
pub mod model;
pub mod speech;

#[cfg(feature = "api")]
pub mod weather;

#[cfg(feature = "api")]
pub mod web;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use advisory::{advise, details_for, normalize, tips_for, CropKey, FertilizerAdvice};
pub use config::AppConfig;
pub use flow::{run_advisory, AdvisoryInput, AdvisoryReport, WeatherStatus};
pub use model::{CropClassifier, CropLabel, FeatureVector, ForestModel};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
