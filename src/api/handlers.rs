use crate::api::AppState;
use crate::error::{AppError, FieldErrors, Result};
use crate::metrics::gather_metrics;
use crate::models::Incident;
use crate::query::{IncidentPage, ListParams};
use crate::validation::{CreateIncidentRequest, UpdateIncidentRequest};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Prometheus text exposition
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        gather_metrics(),
    )
}

/// List incidents with filtering, sorting and pagination
pub async fn list_incidents(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<IncidentPage>> {
    let Query(params) =
        params.map_err(|e| AppError::Validation(FieldErrors::single("query", e.body_text())))?;

    let page = state.service.list(&params).await?;
    Ok(Json(page))
}

/// Create an incident
pub async fn create_incident(
    State(state): State<AppState>,
    body: std::result::Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Incident>)> {
    let Json(request) = body.map_err(body_error)?;
    let payload = request.into_new_incident()?;

    let created = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get incident by ID
pub async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Incident>> {
    let id = parse_id(&id)?;

    let incident = state.service.get(&id).await?;
    Ok(Json(incident))
}

/// Partially update an incident
pub async fn update_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateIncidentRequest>, JsonRejection>,
) -> Result<Json<Incident>> {
    let Json(request) = body.map_err(body_error)?;
    let patch = request.into_patch()?;
    let id = parse_id(&id)?;

    let updated = state.service.update(&id, patch).await?;
    Ok(Json(updated))
}

/// Ids are UUIDs; anything else cannot name a stored incident
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Incident {} not found", raw)))
}

fn body_error(rejection: JsonRejection) -> AppError {
    AppError::Validation(FieldErrors::single("body", rejection.body_text()))
}
