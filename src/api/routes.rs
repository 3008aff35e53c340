use crate::api::{handlers, AppState};
use crate::metrics::track_metrics;
use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Base path of the incident resource
pub const INCIDENTS_PATH: &str = "/api/incidents";

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    let metrics_enabled = state.metrics_enabled;

    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        // Incident management
        .route(
            INCIDENTS_PATH,
            get(handlers::list_incidents).post(handlers::create_incident),
        )
        .route(
            "/api/incidents/:id",
            get(handlers::get_incident).patch(handlers::update_incident),
        );

    if metrics_enabled {
        router = router
            .route("/metrics", get(handlers::metrics))
            .route_layer(middleware::from_fn(track_metrics));
    }

    router
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
