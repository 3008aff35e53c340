use crate::error::{AppError, Result};
use crate::models::{Incident, IncidentPatch};
use crate::query::{self, IncidentPage, IncidentQuery};
use crate::state::IncidentStore;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Persistent incident store using Sled embedded database
#[derive(Clone)]
pub struct SledStore {
    db: Arc<Db>,
    incidents_tree: sled::Tree,
}

impl SledStore {
    /// Create a new Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref();
        let db = sled::open(&path).map_err(|e| {
            AppError::Database(format!("Failed to open Sled database: {}", e))
        })?;

        let incidents_tree = db.open_tree("incidents").map_err(|e| {
            AppError::Database(format!("Failed to open incidents tree: {}", e))
        })?;

        tracing::info!("Initialized Sled store at {:?}", path_str);

        Ok(Self {
            db: Arc::new(db),
            incidents_tree,
        })
    }

    /// Serialize incident to bytes
    fn serialize_incident(incident: &Incident) -> Result<Vec<u8>> {
        bincode::serialize(incident).map_err(|e| {
            AppError::Serialization(format!("Failed to serialize incident: {}", e))
        })
    }

    /// Deserialize incident from bytes
    fn deserialize_incident(bytes: &[u8]) -> Result<Incident> {
        bincode::deserialize(bytes).map_err(|e| {
            AppError::Serialization(format!("Failed to deserialize incident: {}", e))
        })
    }

    /// Get incident key
    fn incident_key(id: &Uuid) -> Vec<u8> {
        id.as_bytes().to_vec()
    }

    fn flush_db(&self) -> Result<()> {
        self.db.flush().map_err(|e| {
            AppError::Database(format!("Failed to flush database: {}", e))
        })?;
        Ok(())
    }

    /// Decode every stored incident in one pass over the tree
    fn load_all(&self) -> Result<Vec<Incident>> {
        self.incidents_tree
            .iter()
            .values()
            .map(|value| {
                let bytes = value.map_err(|e| {
                    AppError::Database(format!("Failed to iterate incidents: {}", e))
                })?;
                Self::deserialize_incident(&bytes)
            })
            .collect()
    }
}

#[async_trait]
impl IncidentStore for SledStore {
    async fn insert_incident(&self, incident: &Incident) -> Result<()> {
        let key = Self::incident_key(&incident.id);
        let value = Self::serialize_incident(incident)?;

        // Only succeeds when the key is vacant
        self.incidents_tree
            .compare_and_swap(&key, None as Option<&[u8]>, Some(value))
            .map_err(|e| AppError::Database(format!("Failed to save incident: {}", e)))?
            .map_err(|_| {
                AppError::Database(format!("Incident {} already exists", incident.id))
            })?;

        // Flush to ensure durability
        self.flush_db()?;

        tracing::debug!(incident_id = %incident.id, "Incident saved to Sled");
        Ok(())
    }

    async fn get_incident(&self, id: &Uuid) -> Result<Option<Incident>> {
        let key = Self::incident_key(id);

        match self.incidents_tree.get(&key) {
            Ok(Some(bytes)) => {
                let incident = Self::deserialize_incident(&bytes)?;
                Ok(Some(incident))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(AppError::Database(format!(
                "Failed to get incident: {}",
                e
            ))),
        }
    }

    async fn update_incident(&self, id: &Uuid, patch: &IncidentPatch) -> Result<Option<Incident>> {
        let key = Self::incident_key(id);

        loop {
            let current = match self.incidents_tree.get(&key) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => return Ok(None),
                Err(e) => {
                    return Err(AppError::Database(format!(
                        "Failed to read incident: {}",
                        e
                    )))
                }
            };

            let mut incident = Self::deserialize_incident(&current)?;
            incident.apply(patch);
            let value = Self::serialize_incident(&incident)?;

            let swapped = self
                .incidents_tree
                .compare_and_swap(&key, Some(current), Some(value))
                .map_err(|e| AppError::Database(format!("Failed to update incident: {}", e)))?;

            match swapped {
                Ok(()) => {
                    self.flush_db()?;
                    tracing::debug!(incident_id = %id, "Incident updated in Sled");
                    return Ok(Some(incident));
                }
                // Another writer got in between; reapply on top of its value
                Err(_) => {
                    tracing::trace!(incident_id = %id, "Concurrent update, retrying");
                }
            }
        }
    }

    async fn query_incidents(&self, query: &IncidentQuery) -> Result<IncidentPage> {
        let incidents = self.load_all()?;
        Ok(query::execute(query, &incidents))
    }

    async fn clear_incidents(&self) -> Result<u64> {
        let removed = self.incidents_tree.len() as u64;

        self.incidents_tree.clear().map_err(|e| {
            AppError::Database(format!("Failed to clear incidents: {}", e))
        })?;
        self.flush_db()?;

        tracing::info!(removed, "Cleared Sled incident store");
        Ok(removed)
    }
}
