//! Query pipeline stages.
//!
//! Each stage takes the request parameters and the collection handle,
//! validates its inputs, and returns a narrowed/reordered handle. Stages run
//! in a fixed order: field filtering, scope filtering (endpoint-specific),
//! ordering, search, pagination. Malformed input raises `BadRequest`; the
//! envelope layer turns that into a 400.

use std::collections::HashMap;

use crate::error::ApiError;
use crate::store::{CollectionQuery, FieldFilter, FilterOperator, FilterValue};

/// Decoded query-string parameters.
pub type Params = HashMap<String, String>;

/// Control parameters that are never treated as field filters.
pub const RESERVED_PARAMS: &[&str] = &[
    "order", "search", "fields", "limit", "offset", "type", "child_of",
];

/// Default pagination window size.
const DEFAULT_LIMIT: u64 = 20;

/// Filter suffixes (`<field>__<suffix>=<value>`) and their operators.
const FILTER_SUFFIXES: &[(&str, FilterOperator)] = &[
    ("contains", FilterOperator::Contains),
    ("startswith", FilterOperator::StartsWith),
    ("gt", FilterOperator::GreaterThan),
    ("lt", FilterOperator::LessThan),
    ("gte", FilterOperator::GreaterOrEqual),
    ("lte", FilterOperator::LessOrEqual),
];

/// Stage 1: treat every non-reserved parameter as a field filter against
/// the declared fields of the effective kind.
pub fn apply_field_filters(
    params: &Params,
    allowed: &[String],
    mut query: CollectionQuery,
) -> Result<CollectionQuery, ApiError> {
    let mut names: Vec<&String> = params
        .keys()
        .filter(|name| !RESERVED_PARAMS.contains(&name.as_str()))
        .collect();
    // Deterministic validation order regardless of map iteration.
    names.sort();

    for name in names {
        let value = params.get(name).map(String::as_str).unwrap_or_default();
        query = query.filter(parse_filter(name, value, allowed)?);
    }
    Ok(query)
}

fn parse_filter(param: &str, value: &str, allowed: &[String]) -> Result<FieldFilter, ApiError> {
    let (field, operator) = match param.rsplit_once("__") {
        Some((base, suffix)) => match FILTER_SUFFIXES
            .iter()
            .find(|(name, _)| *name == suffix)
        {
            Some((_, operator)) => (base, *operator),
            // Unknown suffix: the whole parameter is (not) a field name.
            None => (param, FilterOperator::Equals),
        },
        None => (param, FilterOperator::Equals),
    };

    if !allowed.iter().any(|f| f == field) {
        return Err(ApiError::BadRequest(format!(
            "cannot filter by '{field}' (unknown field)"
        )));
    }

    let value = match operator {
        FilterOperator::GreaterThan
        | FilterOperator::LessThan
        | FilterOperator::GreaterOrEqual
        | FilterOperator::LessOrEqual => match value.parse::<i64>() {
            Ok(int) => FilterValue::Integer(int),
            Err(_) => {
                return Err(ApiError::BadRequest(format!(
                    "filter '{param}' requires an integer value"
                )));
            }
        },
        _ => FilterValue::Text(value.to_string()),
    };

    Ok(FieldFilter {
        field: field.to_string(),
        operator,
        value,
    })
}

/// Stage 3: `order=<field>` sorts ascending; `order=-<field>` reverses the
/// ascending-sorted sequence. `id` is always sortable; anything else must
/// be a declared field.
pub fn apply_ordering(
    params: &Params,
    allowed: &[String],
    query: CollectionQuery,
) -> Result<CollectionQuery, ApiError> {
    let Some(order) = params.get("order") else {
        return Ok(query);
    };

    let (field, reverse) = match order.strip_prefix('-') {
        Some(field) => (field, true),
        None => (order.as_str(), false),
    };

    if field == "id" || allowed.iter().any(|f| f == field) {
        Ok(query.order_by(field, reverse))
    } else {
        Err(ApiError::BadRequest(format!(
            "cannot order by '{field}' (unknown field)"
        )))
    }
}

/// Stage 5: apply the `[offset, offset+limit)` window. The caller must
/// have counted the collection before this runs.
pub fn apply_pagination(
    params: &Params,
    query: CollectionQuery,
) -> Result<CollectionQuery, ApiError> {
    let offset = parse_window(params, "offset", 0)?;
    let limit = parse_window(params, "limit", DEFAULT_LIMIT)?;
    Ok(query.sliced(offset, limit))
}

fn parse_window(params: &Params, name: &str, default: u64) -> Result<u64, ApiError> {
    match params.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ApiError::BadRequest(format!("{name} must be a positive integer"))),
    }
}

/// Requested listing fields: the comma-separated `fields` parameter, or
/// the endpoint's default selection.
pub fn requested_fields(params: &Params, default: &[&str]) -> Vec<String> {
    match params.get("fields") {
        Some(raw) => raw.split(',').map(str::to_string).collect(),
        None => default.iter().map(|s| (*s).to_string()).collect(),
    }
}
