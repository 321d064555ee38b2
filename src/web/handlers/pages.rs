// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::{
    extract::{rejection::FormRejection, Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::advisory::NO_DETAILS_MESSAGE;
use crate::api_server::AppState;
use crate::flow::{AdvisoryReport, WeatherStatus};
use crate::model::features::{DEFAULT_PH, DEFAULT_RAINFALL_MM};
use crate::model::WeatherSample;
use crate::web::form::AdvisoryForm;

const TITLE: &str = "Smart Crop Recommendation System";

// ============================================================================
// View Models
// ============================================================================

/// Current form values, pre-formatted for the input widgets
pub struct FormView {
    pub city: String,
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub temperature: String,
    pub humidity: String,
    pub ph: String,
    pub rainfall: String,
}

impl FormView {
    fn new(form: &AdvisoryForm, weather: &WeatherStatus) -> Self {
        let fallback = WeatherSample::or_defaults(weather.sample());
        let num = |v: Option<f64>, default: f64| v.unwrap_or(default).to_string();

        Self {
            city: form.city().unwrap_or_default().to_string(),
            nitrogen: num(form.nitrogen, 0.0),
            phosphorus: num(form.phosphorus, 0.0),
            potassium: num(form.potassium, 0.0),
            temperature: num(form.temperature, fallback.temperature),
            humidity: num(form.humidity, fallback.humidity),
            ph: num(form.ph, DEFAULT_PH),
            rainfall: num(form.rainfall, DEFAULT_RAINFALL_MM),
        }
    }
}

pub struct BannerView {
    pub ok: bool,
    pub text: String,
}

impl BannerView {
    fn from_status(status: &WeatherStatus) -> Option<Self> {
        status.message().map(|text| Self {
            ok: matches!(status, WeatherStatus::Live(_)),
            text,
        })
    }
}

pub struct DetailsView {
    pub temperature: String,
    pub ph: String,
    pub rainfall: String,
    pub tips: String,
    pub harvest_time: String,
}

pub struct ResultView {
    pub display_name: String,
    pub advice_lines: Vec<String>,
    pub tips: String,
    pub details: Option<DetailsView>,
    pub no_details: String,
}

impl From<&AdvisoryReport> for ResultView {
    fn from(report: &AdvisoryReport) -> Self {
        Self {
            display_name: report.display_name.clone(),
            advice_lines: report.fertilizer.messages(),
            tips: report.tips.to_string(),
            details: report.details.map(|d| DetailsView {
                temperature: d.temperature.to_string(),
                ph: d.ph.to_string(),
                rainfall: d.rainfall.to_string(),
                tips: d.tips.to_string(),
                harvest_time: d.harvest_time.to_string(),
            }),
            no_details: format!("ℹ️ {}", NO_DETAILS_MESSAGE),
        }
    }
}

// ============================================================================
// Home Page
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub form: FormView,
    pub weather_banner: Option<BannerView>,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

impl HomeTemplate {
    fn new(form: &AdvisoryForm, weather: &WeatherStatus) -> Self {
        Self {
            title: TITLE.to_string(),
            form: FormView::new(form, weather),
            weather_banner: BannerView::from_status(weather),
            result: None,
            error: None,
        }
    }

    fn html(&self) -> Html<String> {
        Html(self.render().unwrap_or_else(|e| format!("Template error: {}", e)))
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct HomeQuery {
    pub city: Option<String>,
}

/// Empty form; `?city=` pre-fills temperature and humidity from live weather
pub async fn home_page(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let form = AdvisoryForm {
        city: query.city,
        ..Default::default()
    };
    let weather = form.lookup_weather(state.weather.as_ref()).await;
    HomeTemplate::new(&form, &weather).html()
}

/// "Predict Crop" action
pub async fn predict_page(
    State(state): State<AppState>,
    form: Result<Form<AdvisoryForm>, FormRejection>,
) -> impl IntoResponse {
    // Unparseable fields re-render the page with the error
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Rejected predict form: {}", rejection.body_text());
            let mut page = HomeTemplate::new(&AdvisoryForm::default(), &WeatherStatus::NotRequested);
            page.error = Some(rejection.body_text());
            return (rejection.status(), page.html());
        }
    };
    let echo = form.clone();

    match state.advise(form).await {
        Ok((input, report)) => {
            let mut page = HomeTemplate::new(&echo, &input.weather_status);
            page.result = Some(ResultView::from(&report));
            (StatusCode::OK, page.html())
        }
        Err(e) => {
            let mut page = HomeTemplate::new(&echo, &WeatherStatus::NotRequested);
            page.error = Some(e.to_string());
            (e.status(), page.html())
        }
    }
}
