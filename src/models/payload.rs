use serde::Serialize;

use crate::models::{IncidentStatus, Severity};

/// Validated payload for creating an incident
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncident {
    pub title: String,
    pub service: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub owner: Option<String>,
    pub summary: Option<String>,
}

/// Validated partial update.
///
/// `None` leaves a field untouched. For the nullable fields the inner
/// option distinguishes "set to this value" from "clear".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncidentPatch {
    pub title: Option<String>,
    pub service: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<IncidentStatus>,
    pub owner: Option<Option<String>>,
    pub summary: Option<Option<String>>,
}

impl IncidentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.service.is_none()
            && self.severity.is_none()
            && self.status.is_none()
            && self.owner.is_none()
            && self.summary.is_none()
    }
}
