//! Shared helpers for the integration tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use incident_tracker::{
    api::{build_router, AppState},
    config::QueryConfig,
    models::{IncidentStatus, NewIncident, Severity},
    service::IncidentService,
    state::create_in_memory_store,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router over a fresh in-memory store
pub fn test_app() -> Router {
    let service = IncidentService::new(create_in_memory_store(), QueryConfig::default());
    build_router(AppState::new(Arc::new(service)))
}

/// Send one request and decode the JSON response body
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

pub fn new_incident(title: &str, service: &str, severity: Severity, summary: Option<&str>) -> NewIncident {
    NewIncident {
        title: title.to_string(),
        service: service.to_string(),
        severity,
        status: IncidentStatus::Open,
        owner: Some("oncall@example.com".to_string()),
        summary: summary.map(str::to_string),
    }
}

/// Metric sample lines (no comments) for a metric name
pub fn metric_samples<'a>(exposition: &'a str, name: &str) -> Vec<&'a str> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#') && line.starts_with(name))
        .collect()
}
