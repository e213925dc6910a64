//! Endpoint contract and shared listing/detail flows.
//!
//! One [`ApiEndpoint`] implementation exists per content kind. The trait
//! supplies what varies — base collection, base fields, metadata, extra
//! scope filters — while [`listing_view`] and [`detail_view`] run the
//! shared pipeline: filter, scope, order, search, count, paginate,
//! serialize, envelope.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::{Map, Value};

use crate::content::ObjectSerializer;
use crate::error::ApiError;
use crate::models::Record;
use crate::state::AppState;
use crate::store::CollectionQuery;

use super::envelope;
use super::pipeline::{self, Params};

/// Resolved listing scope: the base collection plus the effective field
/// set used for filter and ordering validation.
pub struct ListingScope {
    pub collection: CollectionQuery,
    pub api_fields: Vec<String>,
}

/// Capability set of one content-kind endpoint.
#[async_trait]
pub trait ApiEndpoint: Send + Sync {
    /// Collection key in listing envelopes (e.g. "pages").
    fn collection_name(&self) -> &'static str;

    /// Singular name used in not-found messages (e.g. "page").
    fn entity_name(&self) -> &'static str;

    /// Fields every kind served by this endpoint exposes, ahead of the
    /// per-kind declarations.
    fn base_fields(&self) -> &'static [&'static str];

    /// Default listing field selection when `fields` is absent.
    fn default_fields(&self) -> &'static [&'static str] {
        &["title"]
    }

    /// Resolve the listing's base collection and effective field set,
    /// including any `type` resolution.
    fn listing_scope(&self, state: &AppState, params: &Params) -> Result<ListingScope, ApiError>;

    /// Base scope for detail lookups (site and visibility constraints).
    fn detail_scope(&self, state: &AppState) -> CollectionQuery;

    /// Kind-specific scope filters (e.g. `child_of`), applied after field
    /// filtering and before ordering.
    async fn apply_scope_filters(
        &self,
        _state: &AppState,
        _params: &Params,
        query: CollectionQuery,
    ) -> Result<CollectionQuery, ApiError> {
        Ok(query)
    }

    /// Kind-specific metadata block; empty means no `meta` key is emitted.
    fn metadata(&self, _record: &Record, _show_details: bool) -> Map<String, Value> {
        Map::new()
    }
}

/// Shared listing operation.
pub async fn listing_view(
    endpoint: &dyn ApiEndpoint,
    state: &AppState,
    params: &Params,
) -> Result<Response, ApiError> {
    let scope = endpoint.listing_scope(state, params)?;

    let query = pipeline::apply_field_filters(params, &scope.api_fields, scope.collection)?;
    let query = endpoint.apply_scope_filters(state, params, query).await?;
    let query = pipeline::apply_ordering(params, &scope.api_fields, query)?;

    let query = match params.get("search") {
        Some(search_query) => state.search().search(search_query, query).await?,
        None => query,
    };

    // The reported total must never be affected by limit/offset.
    let total_count = state.store().count(&query).await?;
    let query = pipeline::apply_pagination(params, query)?;
    let records = state.store().fetch(&query).await?;

    let requested = pipeline::requested_fields(params, endpoint.default_fields());
    let serializer = ObjectSerializer::new(state.fields());
    let documents: Vec<Value> = records
        .iter()
        .map(|record| {
            let api_fields = state
                .fields()
                .api_fields(endpoint.base_fields(), Some(record.kind()));
            Value::Object(serializer.serialize(
                record,
                &api_fields,
                Some(&requested),
                endpoint.metadata(record, false),
            ))
        })
        .collect();

    Ok(envelope::json_response(
        StatusCode::OK,
        &envelope::listing(endpoint.collection_name(), total_count, documents),
    ))
}

/// Shared detail operation: direct id lookup within the kind's base scope,
/// serialized with the full registry for the entity's kind.
pub async fn detail_view(
    endpoint: &dyn ApiEndpoint,
    state: &AppState,
    id: i64,
) -> Result<Response, ApiError> {
    let scope = endpoint.detail_scope(state);
    let record = state
        .store()
        .get(&scope, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", endpoint.entity_name())))?;

    let api_fields = state
        .fields()
        .api_fields(endpoint.base_fields(), Some(record.kind()));
    let serializer = ObjectSerializer::new(state.fields());
    let document = serializer.serialize(&record, &api_fields, None, endpoint.metadata(&record, true));

    Ok(envelope::json_response(
        StatusCode::OK,
        &Value::Object(document),
    ))
}
