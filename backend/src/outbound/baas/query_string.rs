//! Translation of port queries into PostgREST query parameters.

use serde_json::Value;

use crate::domain::ports::{Filter, Join, ListQuery};

/// `select` value: every column, plus the embedded join when present.
pub(super) fn select(join: Option<&Join>) -> String {
    match join {
        Some(join) => format!(
            "*,{alias}:{fk}({columns})",
            alias = join.alias,
            fk = join.foreign_key,
            columns = join.columns.join(",")
        ),
        None => "*".to_owned(),
    }
}

/// Render a filter as a `(column, operator.value)` pair.
pub(super) fn filter(filter: &Filter) -> (String, String) {
    let operand = match &filter.value {
        Value::Null => "is.null".to_owned(),
        Value::String(s) => format!("eq.{s}"),
        other => format!("eq.{other}"),
    };
    (filter.column.to_owned(), operand)
}

/// `?id=eq.{id}` selector for single-row writes.
pub(super) fn id_eq(id: &str) -> (String, String) {
    ("id".to_owned(), format!("eq.{id}"))
}

/// Full parameter list for a listing.
pub(super) fn list_params(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_owned(), select(query.join.as_ref()))];
    if let Some(f) = &query.filter {
        params.push(filter(f));
    }
    if let Some(order) = query.order_by {
        params.push(("order".to_owned(), format!("{}.desc", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_owned(), limit.to_string()));
    }
    params
}

/// Parameters for a count; only the filter matters.
pub(super) fn count_params(filter_by: Option<&Filter>) -> Vec<(String, String)> {
    let mut params = vec![("select".to_owned(), "*".to_owned())];
    if let Some(f) = filter_by {
        params.push(filter(f));
    }
    params
}

/// Total from a `Content-Range` header such as `0-9/12` or `*/0`.
pub(super) fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}
