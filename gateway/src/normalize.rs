//! Reconciles the upstream's heterogeneous listing shapes into the one
//! canonical contract callers rely on: a list field plus a page-based
//! pagination descriptor. Normalization is idempotent, so already-canonical
//! bodies pass through unchanged.

use crate::request_query::RequestQuery;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: u64,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Paging parameters requested by the caller, recovered leniently: anything
/// missing or unparseable falls back to page 1 / unspecified size.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageRequest {
    pub fn from_query(query: &RequestQuery) -> Self {
        PageRequest {
            page: positive_param(query, "page"),
            page_size: positive_param(query, "page_size"),
        }
    }

    fn current_page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

fn positive_param(query: &RequestQuery, name: &str) -> Option<u64> {
    query
        .get(name)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value >= 1)
}

pub fn normalize_listing(body: Value, list_key: &str, page: &PageRequest) -> Value {
    match body {
        Value::Object(mut map) => {
            if matches!(map.get(list_key), Some(Value::Array(_))) {
                // Canonical already; synthesize pagination only when absent.
                if !matches!(map.get("pagination"), Some(Value::Object(_))) {
                    let len = map
                        .get(list_key)
                        .and_then(Value::as_array)
                        .map(|items| items.len())
                        .unwrap_or(0);
                    map.insert("pagination".to_string(), json!(single_page(len, page)));
                }
                Value::Object(map)
            } else if matches!(map.get("results"), Some(Value::Array(_))) {
                // Offset-style pagination: recompute a page-based descriptor
                // from count/next/previous markers.
                let items = map.remove("results").unwrap_or_else(|| json!([]));
                let len = items.as_array().map(|items| items.len()).unwrap_or(0) as u64;
                let total_count = map.get("count").and_then(Value::as_u64).unwrap_or(len);
                let page_size = page
                    .page_size
                    .unwrap_or(if len == 0 { DEFAULT_PAGE_SIZE } else { len });
                let pagination = Pagination {
                    total_count,
                    page_size,
                    current_page: page.current_page(),
                    total_pages: total_count.div_ceil(page_size).max(1),
                    has_next: marker_present(map.get("next")),
                    has_previous: marker_present(map.get("previous")),
                };
                listing(list_key, items, pagination)
            } else {
                for alt in ["items", "data"] {
                    if matches!(map.get(alt), Some(Value::Array(_))) {
                        let items = map.remove(alt).unwrap_or_else(|| json!([]));
                        return from_array(items, list_key, page);
                    }
                }
                empty_listing(list_key, page)
            }
        }
        Value::Array(_) => from_array(body, list_key, page),
        _ => empty_listing(list_key, page),
    }
}

/// The canonical empty listing; also serves as the fallback payload for
/// listing endpoints whose fallback is simply "nothing to show".
pub fn empty_listing(list_key: &str, page: &PageRequest) -> Value {
    listing(
        list_key,
        json!([]),
        Pagination {
            total_count: 0,
            page_size: page.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            current_page: 1,
            total_pages: 1,
            has_next: false,
            has_previous: false,
        },
    )
}

fn from_array(items: Value, list_key: &str, page: &PageRequest) -> Value {
    let len = items.as_array().map(|items| items.len()).unwrap_or(0);
    listing(list_key, items, single_page(len, page))
}

fn single_page(len: usize, page: &PageRequest) -> Pagination {
    Pagination {
        total_count: len as u64,
        page_size: page
            .page_size
            .unwrap_or(if len == 0 { DEFAULT_PAGE_SIZE } else { len as u64 }),
        current_page: 1,
        total_pages: 1,
        has_next: false,
        has_previous: false,
    }
}

fn marker_present(marker: Option<&Value>) -> bool {
    marker.is_some_and(|value| !value.is_null())
}

fn listing(list_key: &str, items: Value, pagination: Pagination) -> Value {
    let mut map = Map::new();
    map.insert(list_key.to_string(), items);
    map.insert("pagination".to_string(), json!(pagination));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u64, page_size: u64) -> PageRequest {
        PageRequest {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    fn pagination_of(value: &Value) -> Pagination {
        serde_json::from_value(value["pagination"].clone()).expect("pagination present")
    }

    #[test]
    fn offset_style_body_is_recomputed() {
        let body = json!({
            "count": 23,
            "next": "http://upstream/api/blogs/?page=3",
            "previous": "http://upstream/api/blogs/?page=1",
            "results": [{}, {}, {}, {}, {}],
        });

        let normalized = normalize_listing(body, "blogs", &page(2, 5));

        assert_eq!(normalized["blogs"].as_array().unwrap().len(), 5);
        assert_eq!(
            pagination_of(&normalized),
            Pagination {
                total_count: 23,
                page_size: 5,
                current_page: 2,
                total_pages: 5,
                has_next: true,
                has_previous: true,
            }
        );
    }

    #[test]
    fn offset_style_null_markers_mean_no_neighbor_pages() {
        let body = json!({"count": 3, "next": null, "previous": null, "results": [{}, {}, {}]});
        let normalized = normalize_listing(body, "blogs", &PageRequest::default());
        let pagination = pagination_of(&normalized);

        assert!(!pagination.has_next);
        assert!(!pagination.has_previous);
        // no requested size: inferred from the page contents
        assert_eq!(pagination.page_size, 3);
        assert_eq!(pagination.current_page, 1);
    }

    #[test]
    fn canonical_body_passes_through() {
        let body = json!({
            "blogs": [{"slug": "a"}],
            "pagination": {
                "total_count": 1, "page_size": 10, "current_page": 1,
                "total_pages": 1, "has_next": false, "has_previous": false,
            },
            "extra": "kept",
        });

        let normalized = normalize_listing(body.clone(), "blogs", &PageRequest::default());
        assert_eq!(normalized, body);
    }

    #[test]
    fn canonical_body_without_pagination_gets_one() {
        let body = json!({"pages": [{}, {}]});
        let normalized = normalize_listing(body, "pages", &PageRequest::default());
        assert_eq!(
            pagination_of(&normalized),
            Pagination {
                total_count: 2,
                page_size: 2,
                current_page: 1,
                total_pages: 1,
                has_next: false,
                has_previous: false,
            }
        );
    }

    #[test]
    fn raw_array_becomes_single_page() {
        let normalized = normalize_listing(json!([{}, {}, {}]), "blogs", &PageRequest::default());
        assert_eq!(normalized["blogs"].as_array().unwrap().len(), 3);

        let pagination = pagination_of(&normalized);
        assert_eq!(pagination.total_count, 3);
        assert_eq!(pagination.total_pages, 1);
    }

    #[test]
    fn alternate_field_names_are_recognized() {
        for alt in ["items", "data"] {
            let body = json!({ (alt): [{}, {}] });
            let normalized = normalize_listing(body, "blogs", &PageRequest::default());
            assert_eq!(normalized["blogs"].as_array().unwrap().len(), 2, "{alt}");
        }
    }

    #[test]
    fn unrecognized_body_degrades_to_empty_listing() {
        for body in [json!({}), json!({"detail": "error"}), json!("nope"), json!(null)] {
            let normalized = normalize_listing(body, "blogs", &page(1, 24));
            assert_eq!(normalized["blogs"], json!([]));
            let pagination = pagination_of(&normalized);
            assert_eq!(pagination.total_count, 0);
            assert_eq!(pagination.total_pages, 1);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let bodies = [
            json!({"count": 23, "next": "n", "previous": null, "results": [{}, {}]}),
            json!([{}, {}]),
            json!({"blogs": [{}]}),
            json!({}),
        ];

        for body in bodies {
            let once = normalize_listing(body, "blogs", &page(2, 5));
            let twice = normalize_listing(once.clone(), "blogs", &page(2, 5));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn page_request_parses_leniently() {
        let query = RequestQuery::Parsed(vec![
            ("page".into(), "2".into()),
            ("page_size".into(), "abc".into()),
        ]);
        let page = PageRequest::from_query(&query);
        assert_eq!(page.page, Some(2));
        assert_eq!(page.page_size, None);

        let page = PageRequest::from_query(&RequestQuery::Parsed(vec![(
            "page".into(),
            "0".into(),
        )]));
        assert_eq!(page.page, None);
    }
}
