use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString};

use crate::models::Incident;

/// Fields a listing may be ordered by
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Id,
    Title,
    Service,
    Severity,
    Status,
    Owner,
    Summary,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Compare two incidents on this field alone.
    ///
    /// Enum columns compare by their wire value, the same order a text
    /// column would give. Missing optional values sort before present ones.
    pub fn compare(&self, a: &Incident, b: &Incident) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Service => a.service.cmp(&b.service),
            SortField::Severity => a.severity.as_ref().cmp(b.severity.as_ref()),
            SortField::Status => a.status.as_ref().cmp(b.status.as_ref()),
            SortField::Owner => a.owner.cmp(&b.owner),
            SortField::Summary => a.summary.cmp(&b.summary),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Order by `field`, breaking ties on `id` in the same direction so the
/// result is total and repeatable across requests.
pub fn sort_incidents(incidents: &mut [&Incident], field: SortField, order: SortOrder) {
    incidents.sort_by(|a, b| {
        let ordering = field.compare(a, b).then_with(|| a.id.cmp(&b.id));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
