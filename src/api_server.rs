// Axum server: HTML advisory page plus JSON API
//
// One request = one pass through the advisory flow. The model, weather
// client and speaker are shared read-only handles built at start-up.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::flow::{run_advisory, AdvisoryError, AdvisoryInput, AdvisoryReport, FlowStage};
use crate::model::{CropClassifier, ForestModel};
use crate::speech::{CommandSpeaker, SilentSpeaker, Speaker, SpeechQueue};
use crate::weather::{OpenWeatherClient, WeatherProvider};
use crate::web::form::{AdvisoryForm, FormError};
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn CropClassifier>,
    pub weather: Arc<dyn WeatherProvider>,
    /// `None` when speech is disabled
    pub speech: Option<SpeechQueue>,
}

impl AppState {
    /// Build state from configuration. Fails if the model cannot be loaded.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        tracing::info!("Loading crop model...");
        let model = ForestModel::from_path(&config.model_path).with_context(|| {
            format!("cannot start without crop model at {}", config.model_path.display())
        })?;

        tracing::info!("Initializing weather client...");
        if config.weather_api_key.is_none() {
            tracing::warn!("OPENWEATHER_API_KEY not set; weather lookups will report no data");
        }
        let weather = OpenWeatherClient::from_config(config)?;

        let speaker: Arc<dyn Speaker> = if config.speech_enabled {
            tracing::info!("Speech enabled via '{}'", config.speech_command);
            Arc::new(CommandSpeaker::new(config.speech_command.clone(), config.speech))
        } else {
            Arc::new(SilentSpeaker)
        };

        Ok(Self::with_parts(Arc::new(model), Arc::new(weather), speaker))
    }

    pub fn with_parts(
        classifier: Arc<dyn CropClassifier>,
        weather: Arc<dyn WeatherProvider>,
        speaker: Arc<dyn Speaker>,
    ) -> Self {
        let speech = if speaker.is_silent() {
            None
        } else {
            SpeechQueue::spawn(speaker)
                .map_err(|e| tracing::warn!("Failed to start speech worker: {}", e))
                .ok()
        };

        Self {
            classifier,
            weather,
            speech,
        }
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech.is_some()
    }

    /// Validate, collect weather, predict and build the report.
    ///
    /// Invalid forms are rejected before any weather lookup.
    pub async fn advise(
        &self,
        form: AdvisoryForm,
    ) -> Result<(AdvisoryInput, AdvisoryReport), AppError> {
        tracing::debug!(stage = ?FlowStage::Idle, "advisory request received");
        form.validate()?;
        let weather_status = form.lookup_weather(self.weather.as_ref()).await;
        let input = form.into_input(weather_status)?;
        let report = run_advisory(self.classifier.as_ref(), &input)?;

        self.speak(&report);
        Ok((input, report))
    }

    /// Queue the narration for the speech worker without waiting for playback
    pub fn speak(&self, report: &AdvisoryReport) {
        if let Some(queue) = &self.speech {
            queue.enqueue(report.narration());
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML page
        .route("/", get(pages::home_page))
        .route("/predict", post(pages::predict_page))

        // Health check
        .route("/health", get(health_check))

        // JSON API
        .route("/api/weather", get(get_weather))
        .route("/api/advise", post(post_advise))

        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, serde::Deserialize)]
struct WeatherQuery {
    city: String,
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = params.city.trim();
    if city.is_empty() {
        return Err(AppError::BadRequest("city must not be empty".to_string()));
    }

    let sample = state.weather.fetch(city).await;
    Ok(Json(serde_json::json!({
        "city": city,
        "available": sample.is_some(),
        "temperature": sample.map(|s| s.temperature),
        "humidity": sample.map(|s| s.humidity),
    })))
}

async fn post_advise(
    State(state): State<AppState>,
    Json(form): Json<AdvisoryForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (input, report) = state.advise(form).await?;

    Ok(Json(serde_json::json!({
        "input": input,
        "weather_message": input.weather_status.message(),
        "report": report,
        "fertilizer_text": report.fertilizer.messages(),
    })))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum AppError {
    /// Form values outside the accepted bounds
    Form(FormError),
    /// Classifier rejected the request
    Advisory(AdvisoryError),
    BadRequest(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Form(e) => write!(f, "{}", e),
            AppError::Advisory(e) => write!(f, "{}", e),
            AppError::BadRequest(msg) => f.write_str(msg),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Form(_) | AppError::Advisory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<FormError> for AppError {
    fn from(e: FormError) -> Self {
        AppError::Form(e)
    }
}

impl From<AdvisoryError> for AppError {
    fn from(e: AdvisoryError) -> Self {
        AppError::Advisory(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!("Request failed: {}", self);
        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (self.status(), body).into_response()
    }
}
