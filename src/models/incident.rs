use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::models::{IncidentPatch, NewIncident};

/// Represents a tracked operational incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Short human-readable title
    pub title: String,

    /// Affected service name
    pub service: String,

    /// Severity level
    pub severity: Severity,

    /// Lifecycle status
    pub status: IncidentStatus,

    /// Responsible operator
    pub owner: Option<String>,

    /// Free-form summary
    pub summary: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Create a new incident from a validated payload
    pub fn new(payload: NewIncident) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::now_v7(),
            title: payload.title,
            service: payload.service,
            severity: payload.severity,
            status: payload.status,
            owner: payload.owner,
            summary: payload.summary,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update. Only fields present in the patch change.
    pub fn apply(&mut self, patch: &IncidentPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref service) = patch.service {
            self.service = service.clone();
        }
        if let Some(severity) = patch.severity {
            self.severity = severity;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(ref owner) = patch.owner {
            self.owner = owner.clone();
        }
        if let Some(ref summary) = patch.summary {
            self.summary = summary.clone();
        }

        self.updated_at = Utc::now().max(self.created_at);
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Sev1, // Most severe
    Sev2,
    Sev3,
    Sev4, // Least severe
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display, EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum IncidentStatus {
    Open,
    Mitigated,
    Resolved,
}

/// Services the client offers in its picker. Advisory only; the server
/// accepts any non-empty service name.
pub const KNOWN_SERVICES: &[&str] = &[
    "Auth",
    "Payments",
    "Backend",
    "Frontend",
    "Database",
    "Search",
    "notifications",
];
