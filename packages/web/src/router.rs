//! Axum routes for the classification front-end
//!
//! `GET /` renders the form, `POST /predict` renders it again with the prediction.
//! The same predictor is exposed as JSON under `/api`.

use crate::error::ApiError;
use crate::form::FormBuilder;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use fauna_ml::{FeatureRecord, MLPrediction, predict};
use serde::Serialize;
use std::collections::HashMap;
use tower_http::trace::TraceLayer;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model: String,
}

pub fn web_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/api/schema", get(feature_schema))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "fauna".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.artifacts.description().to_string(),
    })
}

/// Render pass without prediction. Query parameters preselect controls.
async fn index(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let record = FormBuilder::read(&params)?;
    Ok(Html(state.page.render(&record, None)?))
}

/// POST /predict
///
/// Form submission from the page; answers with the page showing the prediction.
async fn predict_form(
    State(state): State<AppState>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let record = FormBuilder::read(&params)?;
    let prediction = predict(&state.artifacts, &record)?;
    tracing::info!(
        class_number = prediction.class_number,
        label = %prediction.label,
        confidence = prediction.confidence,
        "Predicted animal class"
    );
    Ok(Html(state.page.render(&record, Some(&prediction))?))
}

/// POST /api/predict
///
/// Body is a JSON object with all sixteen features.
async fn predict_json(
    State(state): State<AppState>,
    payload: Result<Json<FeatureRecord>, JsonRejection>,
) -> Result<Json<MLPrediction>, ApiError> {
    let Json(record) = payload?;
    let prediction = predict(&state.artifacts, &record)?;
    Ok(Json(prediction))
}

async fn feature_schema() -> Json<schemars::Schema> {
    Json(schemars::schema_for!(FeatureRecord))
}
