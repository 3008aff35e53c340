//! Listing laws checked over a fixed dataset and every combination of
//! filter, sort and page size.

use incident_tracker::{
    config::QueryConfig,
    models::{Incident, IncidentStatus, NewIncident, Severity},
    query::{execute, IncidentFilter, IncidentQuery, ListParams, SortField, SortOrder},
};
use strum::IntoEnumIterator;

const SERVICES: [&str; 3] = ["Auth", "Payments", "Search"];
const WORDS: [&str; 4] = ["latency", "Timeout", "disk", "LATENCY spike"];

fn dataset() -> Vec<Incident> {
    let mut incidents = Vec::new();
    for i in 0..36usize {
        let severity = Severity::iter().nth(i % 4).unwrap();
        let status = IncidentStatus::iter().nth(i % 3).unwrap();
        incidents.push(Incident::new(NewIncident {
            title: format!("{} #{}", WORDS[i % 4], i),
            service: SERVICES[i % 3].to_string(),
            severity,
            status,
            owner: (i % 5 != 0).then(|| format!("owner-{}", i % 7)),
            summary: (i % 2 == 0).then(|| format!("{} observed", WORDS[(i + 1) % 4])),
        }));
    }
    incidents
}

fn filters() -> Vec<IncidentFilter> {
    let mut filters = vec![IncidentFilter::default()];
    for severity in Severity::iter() {
        filters.push(IncidentFilter::new(None, Some(severity), None, None));
    }
    for status in IncidentStatus::iter() {
        filters.push(IncidentFilter::new(Some(status), None, Some("Auth".to_string()), None));
    }
    for term in ["latency", "TIMEOUT", "observed", "nothing-matches"] {
        filters.push(IncidentFilter::new(None, None, None, Some(term.to_string())));
        filters.push(IncidentFilter::new(
            None,
            Some(Severity::Sev2),
            Some("Payments".to_string()),
            Some(term.to_string()),
        ));
    }
    filters
}

/// Reference predicate written independently of `IncidentFilter::matches`
fn expected_match(filter: &IncidentFilter, incident: &Incident) -> bool {
    let exact = filter.status.map_or(true, |s| s == incident.status)
        && filter.severity.map_or(true, |s| s == incident.severity)
        && filter.service.as_ref().map_or(true, |s| *s == incident.service);

    let search = match filter.search() {
        None => true,
        Some(term) => {
            incident.title.to_lowercase().contains(term)
                || incident
                    .summary
                    .as_ref()
                    .map_or(false, |s| s.to_lowercase().contains(term))
        }
    };

    exact && search
}

#[test]
fn test_filter_and_or_law() {
    let incidents = dataset();

    for filter in filters() {
        let query = IncidentQuery {
            limit: 1000,
            filter: filter.clone(),
            ..Default::default()
        };
        let page = execute(&query, &incidents);

        let mut expected: Vec<_> = incidents
            .iter()
            .filter(|i| expected_match(&filter, i))
            .map(|i| i.id)
            .collect();
        let mut actual: Vec<_> = page.data.iter().map(|i| i.id).collect();
        expected.sort();
        actual.sort();

        assert_eq!(actual, expected, "filter {:?}", filter);
        assert_eq!(page.pagination.total, expected.len() as u64);
    }
}

#[test]
fn test_pages_are_contiguous_slices() {
    let incidents = dataset();

    for sort in SortField::iter() {
        for order in SortOrder::iter() {
            let full = execute(
                &IncidentQuery {
                    limit: 1000,
                    sort,
                    order,
                    ..Default::default()
                },
                &incidents,
            );
            assert_eq!(full.data.len(), incidents.len());

            for limit in [1u64, 5, 7, 36, 50] {
                let total_pages = full.pagination.total.div_ceil(limit);

                for page in 1..=total_pages + 2 {
                    let query = IncidentQuery {
                        page,
                        limit,
                        sort,
                        order,
                        ..Default::default()
                    };
                    let result = execute(&query, &incidents);

                    let start = ((page - 1) * limit) as usize;
                    let expected: Vec<_> = full
                        .data
                        .iter()
                        .skip(start)
                        .take(limit as usize)
                        .map(|i| i.id)
                        .collect();
                    let actual: Vec<_> = result.data.iter().map(|i| i.id).collect();

                    assert!(result.data.len() as u64 <= limit);
                    assert_eq!(actual, expected, "sort={} order={} limit={} page={}", sort, order, limit, page);
                    assert_eq!(result.pagination.total, 36);
                    assert_eq!(result.pagination.total_pages, total_pages);
                }
            }
        }
    }
}

#[test]
fn test_orderings_are_total() {
    let incidents = dataset();

    for sort in SortField::iter() {
        let build = |order| IncidentQuery {
            limit: 1000,
            sort,
            order,
            ..Default::default()
        };
        let asc: Vec<_> = execute(&build(SortOrder::Asc), &incidents)
            .data
            .into_iter()
            .map(|i| i.id)
            .collect();
        let mut desc: Vec<_> = execute(&build(SortOrder::Desc), &incidents)
            .data
            .into_iter()
            .map(|i| i.id)
            .collect();

        // With the id tie-break, descending is exactly ascending reversed
        desc.reverse();
        assert_eq!(asc, desc, "sort={}", sort);

        // Input order does not matter
        let reversed: Vec<_> = incidents.iter().rev().cloned().collect();
        let again: Vec<_> = execute(&build(SortOrder::Asc), &reversed)
            .data
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(asc, again, "sort={}", sort);
    }
}

#[test]
fn test_severity_sort_uses_wire_order() {
    let incidents = dataset();
    let query = IncidentQuery {
        limit: 1000,
        sort: SortField::Severity,
        order: SortOrder::Asc,
        ..Default::default()
    };

    let page = execute(&query, &incidents);
    let wire: Vec<String> = page.data.iter().map(|i| i.severity.to_string()).collect();
    let mut sorted = wire.clone();
    sorted.sort();
    assert_eq!(wire, sorted);
    assert_eq!(wire.first().map(String::as_str), Some("SEV1"));
}

#[test]
fn test_params_round_trip_through_query_string_names() {
    let params: ListParams = serde_json::from_value(serde_json::json!({
        "page": "2",
        "limit": "3",
        "sort": "title",
        "order": "ASC",
        "status": "OPEN",
        "severity": "SEV1",
        "service": "Auth",
        "search": "Latency",
    }))
    .unwrap();

    let query = params.resolve(&QueryConfig::default()).unwrap();
    assert_eq!(query.page, 2);
    assert_eq!(query.limit, 3);
    assert_eq!(query.sort, SortField::Title);
    assert_eq!(query.order, SortOrder::Asc);
    assert_eq!(query.filter.status, Some(IncidentStatus::Open));
    assert_eq!(query.filter.severity, Some(Severity::Sev1));
    assert_eq!(query.filter.service.as_deref(), Some("Auth"));
    assert_eq!(query.filter.search(), Some("latency"));
}

#[test]
fn test_empty_result_pagination() {
    let query = IncidentQuery {
        page: 3,
        ..Default::default()
    };
    let page = execute(&query, &Vec::<Incident>::new());

    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.total_pages, 0);
    assert_eq!(page.pagination.page, 3);
}
