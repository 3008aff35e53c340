pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::service::IncidentService;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IncidentService>,
    pub started_at: Instant,
    pub metrics_enabled: bool,
}

impl AppState {
    pub fn new(service: Arc<IncidentService>) -> Self {
        Self {
            service,
            started_at: Instant::now(),
            metrics_enabled: true,
        }
    }

    /// Toggle the `/metrics` endpoint and request metrics middleware
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }
}
