use crate::config::QueryConfig;
use crate::error::{AppError, Result};
use crate::metrics::record_operation;
use crate::models::{Incident, IncidentPatch, NewIncident};
use crate::query::{IncidentPage, ListParams};
use crate::state::IncidentStore;
use std::sync::Arc;
use uuid::Uuid;

/// Incident operations exposed over the API
pub struct IncidentService {
    store: Arc<dyn IncidentStore>,
    query_config: QueryConfig,
}

impl IncidentService {
    pub fn new(store: Arc<dyn IncidentStore>, query_config: QueryConfig) -> Self {
        Self {
            store,
            query_config,
        }
    }

    /// List incidents matching the query string parameters
    pub async fn list(&self, params: &ListParams) -> Result<IncidentPage> {
        let query = params
            .resolve(&self.query_config)
            .inspect_err(|e| record_operation("list", outcome(e)))?;

        tracing::debug!(
            page = query.page,
            limit = query.limit,
            sort = %query.sort,
            order = %query.order,
            filtered = !query.filter.is_empty(),
            "Listing incidents"
        );

        let page = self
            .store
            .query_incidents(&query)
            .await
            .inspect_err(|e| record_operation("list", outcome(e)))?;

        record_operation("list", "ok");
        Ok(page)
    }

    /// Create an incident from a validated payload
    pub async fn create(&self, payload: NewIncident) -> Result<Incident> {
        let incident = Incident::new(payload);

        self.store
            .insert_incident(&incident)
            .await
            .inspect_err(|e| record_operation("create", outcome(e)))?;

        tracing::info!(
            incident_id = %incident.id,
            service = %incident.service,
            severity = %incident.severity,
            status = %incident.status,
            "Incident created"
        );

        record_operation("create", "ok");
        Ok(incident)
    }

    /// Fetch a single incident
    pub async fn get(&self, id: &Uuid) -> Result<Incident> {
        let incident = self
            .store
            .get_incident(id)
            .await
            .inspect_err(|e| record_operation("get", outcome(e)))?
            .ok_or_else(|| not_found(id));

        record_operation("get", outcome_of(&incident));
        incident
    }

    /// Apply a validated partial update. Absent ids are never created.
    pub async fn update(&self, id: &Uuid, patch: IncidentPatch) -> Result<Incident> {
        if patch.is_empty() {
            tracing::debug!(incident_id = %id, "Empty patch, only updatedAt changes");
        }

        let incident = self
            .store
            .update_incident(id, &patch)
            .await
            .inspect_err(|e| record_operation("update", outcome(e)))?
            .ok_or_else(|| not_found(id));

        match &incident {
            Ok(updated) => tracing::info!(
                incident_id = %updated.id,
                status = %updated.status,
                severity = %updated.severity,
                "Incident updated"
            ),
            Err(_) => tracing::debug!(incident_id = %id, "Update addressed unknown incident"),
        }

        record_operation("update", outcome_of(&incident));
        incident
    }
}

fn not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("Incident {} not found", id))
}

fn outcome(error: &AppError) -> &'static str {
    match error {
        AppError::Validation(_) => "invalid",
        AppError::NotFound(_) => "not_found",
        _ => "error",
    }
}

fn outcome_of<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => outcome(e),
    }
}
