//! JSON API behind the web form

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;

use crate::error::ErrorKind;
use crate::models::{FareQuote, TripForm};
use crate::orchestrator::{FareRequestOrchestrator, TripPreview};
use crate::TaxiFareError;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl IntoResponse for TaxiFareError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Network | ErrorKind::UpstreamStatus | ErrorKind::Parse => {
                StatusCode::BAD_GATEWAY
            }
            ErrorKind::Config | ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!("Request failed: {}", self);
        let body = ApiError {
            kind: self.kind(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Bodies that do not deserialize into a [`TripForm`] are validation errors
impl From<JsonRejection> for TaxiFareError {
    fn from(rejection: JsonRejection) -> Self {
        TaxiFareError::validation(rejection.body_text())
    }
}

/// Current wall-clock date and time in the configured trip zone
#[derive(Debug, Serialize)]
pub struct FormDefaults {
    pub date: String,
    pub time: String,
    pub timezone: String,
}

pub fn router(orchestrator: Arc<FareRequestOrchestrator>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/form-defaults", get(form_defaults))
        .route("/api/trip/validate", post(validate_trip))
        .route("/api/fare", post(compute_fare))
        .with_state(orchestrator)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn form_defaults(
    State(orchestrator): State<Arc<FareRequestOrchestrator>>,
) -> Json<FormDefaults> {
    let zone = orchestrator.timezone();
    let now = Utc::now().with_timezone(&zone);
    Json(FormDefaults {
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M").to_string(),
        timezone: zone.name().to_string(),
    })
}

async fn validate_trip(
    State(orchestrator): State<Arc<FareRequestOrchestrator>>,
    payload: Result<Json<TripForm>, JsonRejection>,
) -> Result<Json<TripPreview>, TaxiFareError> {
    let Json(form) = payload?;
    orchestrator.validate_trip(&form).await.map(Json)
}

async fn compute_fare(
    State(orchestrator): State<Arc<FareRequestOrchestrator>>,
    payload: Result<Json<TripForm>, JsonRejection>,
) -> Result<Json<FareQuote>, TaxiFareError> {
    let Json(form) = payload?;
    orchestrator.compute_fare(&form).await.map(Json)
}
