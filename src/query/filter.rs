use crate::models::{Incident, IncidentStatus, Severity};

/// Listing filter.
///
/// All active criteria must hold. The search term matches when it occurs in
/// the title or in the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub severity: Option<Severity>,
    /// Exact, case-sensitive service name
    pub service: Option<String>,
    /// Lowercased on construction; see [`IncidentFilter::search`]
    search: Option<String>,
}

impl IncidentFilter {
    pub fn new(
        status: Option<IncidentStatus>,
        severity: Option<Severity>,
        service: Option<String>,
        search: Option<String>,
    ) -> Self {
        Self {
            status,
            severity,
            service,
            search: search.map(|term| term.to_lowercase()),
        }
    }

    /// Search term, lowercased
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.severity.is_none() && self.service.is_none() && self.search.is_none()
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        let status_match = self.status.map_or(true, |status| incident.status == status);

        let severity_match = self.severity.map_or(true, |severity| incident.severity == severity);

        let service_match = self
            .service
            .as_deref()
            .map_or(true, |service| incident.service == service);

        let search_match = self.search.as_deref().map_or(true, |term| {
            contains_ignore_case(&incident.title, term)
                || incident
                    .summary
                    .as_deref()
                    .is_some_and(|summary| contains_ignore_case(summary, term))
        });

        status_match && severity_match && service_match && search_match
    }
}

/// `needle` must already be lowercase
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
