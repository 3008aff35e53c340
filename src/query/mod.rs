//! Listing engine: turns request parameters into a filtered, ordered and
//! paginated slice of incidents plus total-count metadata.
//!
//! Stores hand [`execute`] every candidate record from one consistent view
//! (a single lock acquisition or a single scan), so the reported `total`
//! and the returned page are always derived from the same data.

pub mod filter;
pub mod pagination;
pub mod params;
pub mod sort;

pub use filter::IncidentFilter;
pub use pagination::{IncidentPage, Pagination};
pub use params::{IncidentQuery, ListParams};
pub use sort::{SortField, SortOrder};

use crate::models::Incident;

/// Filter, order and slice `candidates` according to `query`
pub fn execute<'a, I>(query: &IncidentQuery, candidates: I) -> IncidentPage
where
    I: IntoIterator<Item = &'a Incident>,
{
    let mut matching: Vec<&Incident> = candidates
        .into_iter()
        .filter(|incident| query.filter.matches(incident))
        .collect();

    sort::sort_incidents(&mut matching, query.sort, query.order);

    let total = matching.len() as u64;
    let data = matching
        .into_iter()
        .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
        .cloned()
        .collect();

    IncidentPage {
        data,
        pagination: Pagination::new(total, query.page, query.limit),
    }
}
