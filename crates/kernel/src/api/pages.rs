//! Pages endpoint.
//!
//! Serves the site's content tree: live, non-restricted pages inside the
//! configured site root's subtree. Supports `type` resolution and the
//! `child_of` scope filter, and is the only endpoint emitting a metadata
//! block (kind tag, plus parent id on detail views).

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::Record;
use crate::state::AppState;
use crate::store::CollectionQuery;

use super::endpoint::{ApiEndpoint, ListingScope};
use super::pipeline::Params;

pub struct PagesEndpoint;

impl PagesEndpoint {
    fn base_collection(&self, state: &AppState) -> CollectionQuery {
        CollectionQuery::pages().visible().within(state.site_root())
    }
}

#[async_trait]
impl ApiEndpoint for PagesEndpoint {
    fn collection_name(&self) -> &'static str {
        "pages"
    }

    fn entity_name(&self) -> &'static str {
        "page"
    }

    fn base_fields(&self) -> &'static [&'static str] {
        &["title"]
    }

    fn listing_scope(&self, state: &AppState, params: &Params) -> Result<ListingScope, ApiError> {
        let mut collection = self.base_collection(state);

        // Resolving `type` narrows both the collection and the field set
        // filters and ordering validate against.
        let kind = match params.get("type") {
            Some(name) => {
                if !state.fields().is_node_kind(name) {
                    return Err(ApiError::NotFound(format!("type '{name}' does not exist")));
                }
                collection = collection.of_type(name);
                Some(name.clone())
            }
            None => None,
        };

        let api_fields = state
            .fields()
            .api_fields(self.base_fields(), kind.as_deref());

        Ok(ListingScope {
            collection,
            api_fields,
        })
    }

    fn detail_scope(&self, state: &AppState) -> CollectionQuery {
        self.base_collection(state)
    }

    async fn apply_scope_filters(
        &self,
        state: &AppState,
        params: &Params,
        query: CollectionQuery,
    ) -> Result<CollectionQuery, ApiError> {
        let Some(raw) = params.get("child_of") else {
            return Ok(query);
        };

        let parent_id: i64 = raw
            .parse()
            .map_err(|_| ApiError::BadRequest("child_of must be a positive integer".to_string()))?;

        if !state.store().page_exists(parent_id).await? {
            return Err(ApiError::NotFound("parent page does not exist".to_string()));
        }

        Ok(query.child_of(parent_id))
    }

    fn metadata(&self, record: &Record, show_details: bool) -> Map<String, Value> {
        let mut meta = Map::new();
        if let Record::Page(page) = record {
            meta.insert(
                "type".to_string(),
                Value::String(page.page_type.clone()),
            );
            if show_details {
                meta.insert(
                    "parent_id".to_string(),
                    page.parent_id.map(Value::from).unwrap_or(Value::Null),
                );
            }
        }
        meta
    }
}
