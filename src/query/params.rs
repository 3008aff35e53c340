use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

use crate::config::QueryConfig;
use crate::error::{FieldErrors, Result};
use crate::models::{IncidentStatus, Severity};
use crate::query::{IncidentFilter, SortField, SortOrder};
use crate::validation::expected_one_of;

/// Raw listing parameters as they arrive on the query string.
///
/// Everything is kept as text so that lenient fields (`page`, `limit`) can
/// fall back to defaults instead of failing extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Normalized listing request
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentQuery {
    /// 1-based page number, unbounded above
    pub page: u64,
    /// Page size, between 1 and the configured maximum
    pub limit: u64,
    pub sort: SortField,
    pub order: SortOrder,
    pub filter: IncidentFilter,
}

impl Default for IncidentQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: QueryConfig::default().default_limit,
            sort: SortField::default(),
            order: SortOrder::default(),
            filter: IncidentFilter::default(),
        }
    }
}

impl IncidentQuery {
    /// Number of matching records skipped before the page starts
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl ListParams {
    /// Normalize into an [`IncidentQuery`].
    ///
    /// `page` and `limit` never fail: missing, non-numeric or non-positive
    /// values take their defaults and `limit` is clamped to the configured
    /// maximum. `sort`, `order`, `status` and `severity` must name a known
    /// value when given; every offending field is reported at once.
    pub fn resolve(&self, config: &QueryConfig) -> Result<IncidentQuery> {
        let mut errors = FieldErrors::new();

        let page = parse_positive(self.page.as_deref()).unwrap_or(1);
        let limit = parse_positive(self.limit.as_deref())
            .unwrap_or(config.default_limit)
            .min(config.max_limit);

        let sort = parse_choice::<SortField>(self.sort.as_deref(), "sort", &mut errors)
            .unwrap_or_default();
        let order = parse_choice::<SortOrder>(self.order.as_deref(), "order", &mut errors)
            .unwrap_or_default();
        let status = parse_choice::<IncidentStatus>(self.status.as_deref(), "status", &mut errors);
        let severity = parse_choice::<Severity>(self.severity.as_deref(), "severity", &mut errors);

        errors.into_result()?;

        Ok(IncidentQuery {
            page,
            limit,
            sort,
            order,
            filter: IncidentFilter::new(status, severity, non_empty(self.service.as_deref()), non_empty(self.search.as_deref())),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parse the leading integer of `value` (`"20abc"` is 20, `"2.5"` is 2).
/// `None` when there is no leading integer or it is below 1. Overlong
/// digit runs saturate.
fn parse_positive(value: Option<&str>) -> Option<u64> {
    let value = value?.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() || negative {
        return None;
    }

    let parsed = digits.parse::<u64>().unwrap_or(u64::MAX);
    (parsed >= 1).then_some(parsed)
}

/// Parse an optional enumerated parameter. Empty means "not given";
/// an unknown value is recorded against `field`.
fn parse_choice<E>(value: Option<&str>, field: &str, errors: &mut FieldErrors) -> Option<E>
where
    E: FromStr + IntoEnumIterator + std::fmt::Display,
{
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match E::from_str(value) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.add(field, expected_one_of::<E>(value));
            None
        }
    }
}
