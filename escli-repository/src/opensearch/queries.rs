//! OpenSearch request body builders.
//!
//! This module turns `SearchRequest`s and field mappings into the JSON
//! bodies sent to the backend.

use serde_json::{json, Map, Value};

use crate::types::{FieldMapping, SearchRequest, SortSpec};

/// Build the query clause for a simplified query string.
///
/// - No query, or a blank one, matches every document
/// - `field=value` becomes a `match` query on `field`, split on the first
///   `=` with both sides kept verbatim
/// - Anything else is handed to `query_string` as-is
pub fn build_query(query: Option<&str>) -> Value {
    let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
        return json!({ "match_all": {} });
    };

    match query.split_once('=') {
        Some((field, value)) if !field.is_empty() => json!({
            "match": { field: value }
        }),
        _ => json!({
            "query_string": { "query": query }
        }),
    }
}

/// Build the sort clause for a single-field sort.
pub fn build_sort(sort: &SortSpec) -> Value {
    json!([{ sort.field.as_str(): sort.order.as_str() }])
}

/// Build the full search body for a request.
pub fn build_search_body(request: &SearchRequest) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), build_query(request.query.as_deref()));
    body.insert("from".to_string(), json!(request.pagination.offset()));
    body.insert("size".to_string(), json!(request.pagination.limit()));

    if let Some(sort) = &request.sort {
        body.insert("sort".to_string(), build_sort(sort));
    }

    if !request.fields.is_empty() {
        body.insert(
            "_source".to_string(),
            json!({ "includes": request.fields }),
        );
    }

    Value::Object(body)
}

/// Build the index creation body, or `None` when no mappings are given.
pub fn build_index_body(mappings: &[FieldMapping]) -> Option<Value> {
    if mappings.is_empty() {
        return None;
    }

    let properties: Map<String, Value> = mappings
        .iter()
        .map(|m| (m.name.clone(), json!({ "type": m.field_type })))
        .collect();

    Some(json!({
        "mappings": {
            "properties": properties
        }
    }))
}
