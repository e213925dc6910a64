//! Response envelopes.
//!
//! Listings wrap documents as `{"meta": {"total_count": n}, "<collection>":
//! […]}`; detail views are flat documents; errors are `{"message": …}`.
//! Everything ships pretty-printed with insertion-ordered keys.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

/// Build a pretty-printed JSON response.
pub fn json_response(status: StatusCode, value: &Value) -> Response {
    let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Listing envelope: meta block first, then the named collection.
pub fn listing(collection_name: &str, total_count: u64, documents: Vec<Value>) -> Value {
    let mut meta = Map::new();
    meta.insert("total_count".to_string(), Value::from(total_count));

    let mut envelope = Map::new();
    envelope.insert("meta".to_string(), Value::Object(meta));
    envelope.insert(collection_name.to_string(), Value::Array(documents));
    Value::Object(envelope)
}

/// Error envelope body.
pub fn message(text: &str) -> Value {
    let mut body = Map::new();
    body.insert("message".to_string(), Value::String(text.to_string()));
    Value::Object(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn listing_envelope_orders_meta_first() {
        let value = listing("documents", 12, vec![serde_json::json!({"id": 1})]);
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(
            text,
            r#"{"meta":{"total_count":12},"documents":[{"id":1}]}"#
        );
    }

    #[test]
    fn responses_are_pretty_printed_json() {
        let response = json_response(StatusCode::OK, &message("hello"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
