//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub language: String,
    pub languages: Vec<String>,
}

/// `GET /api/health`: liveness plus the languages this instance can read.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        language: ctx.language.clone(),
        languages: ctx
            .recognizer
            .registry()
            .languages()
            .map(str::to_string)
            .collect(),
    })
}
