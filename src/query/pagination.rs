use serde::{Deserialize, Serialize};

use crate::models::Incident;

/// Page metadata returned alongside listing results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Records matching the filters, independent of page and limit
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// `limit` must be at least 1. An empty result has zero pages.
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentPage {
    pub data: Vec<Incident>,
    pub pagination: Pagination,
}
