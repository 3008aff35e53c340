use crate::error::{AppError, Result};
use crate::models::{Incident, IncidentPatch};
use crate::query::{self, IncidentPage, IncidentQuery};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Trait for incident storage operations
#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Persist a newly created incident
    async fn insert_incident(&self, incident: &Incident) -> Result<()>;

    /// Get an incident by ID
    async fn get_incident(&self, id: &Uuid) -> Result<Option<Incident>>;

    /// Apply a partial update to one incident as a single atomic
    /// read-modify-write. Concurrent updates to the same id resolve last
    /// write wins. Returns `None`, creating nothing, when the id is unknown.
    async fn update_incident(&self, id: &Uuid, patch: &IncidentPatch) -> Result<Option<Incident>>;

    /// Run a listing query. The page and the total are computed from the
    /// same view of the data.
    async fn query_incidents(&self, query: &IncidentQuery) -> Result<IncidentPage>;

    /// Remove every incident, returning how many were removed
    async fn clear_incidents(&self) -> Result<u64>;
}

/// In-memory incident store (for development and testing)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    incidents: Arc<RwLock<HashMap<Uuid, Incident>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncidentStore for InMemoryStore {
    async fn insert_incident(&self, incident: &Incident) -> Result<()> {
        match self.incidents.write().entry(incident.id) {
            Entry::Occupied(_) => {
                return Err(AppError::Database(format!(
                    "Incident {} already exists",
                    incident.id
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(incident.clone());
            }
        }
        tracing::debug!(incident_id = %incident.id, "Incident saved");
        Ok(())
    }

    async fn get_incident(&self, id: &Uuid) -> Result<Option<Incident>> {
        Ok(self.incidents.read().get(id).cloned())
    }

    async fn update_incident(&self, id: &Uuid, patch: &IncidentPatch) -> Result<Option<Incident>> {
        let mut incidents = self.incidents.write();
        let Some(incident) = incidents.get_mut(id) else {
            return Ok(None);
        };

        incident.apply(patch);
        tracing::debug!(incident_id = %id, "Incident updated");
        Ok(Some(incident.clone()))
    }

    async fn query_incidents(&self, query: &IncidentQuery) -> Result<IncidentPage> {
        // Held for the whole scan so count and page agree
        let incidents = self.incidents.read();
        Ok(query::execute(query, incidents.values()))
    }

    async fn clear_incidents(&self) -> Result<u64> {
        let mut incidents = self.incidents.write();
        let removed = incidents.len() as u64;
        incidents.clear();
        tracing::info!(removed, "Cleared incident store");
        Ok(removed)
    }
}
