//! Documents endpoint.
//!
//! Serves all file attachments; no tree scoping and no metadata block.

use crate::error::ApiError;
use crate::models::Document;
use crate::state::AppState;
use crate::store::CollectionQuery;

use super::endpoint::{ApiEndpoint, ListingScope};
use super::pipeline::Params;

pub struct DocumentsEndpoint;

impl ApiEndpoint for DocumentsEndpoint {
    fn collection_name(&self) -> &'static str {
        "documents"
    }

    fn entity_name(&self) -> &'static str {
        "document"
    }

    fn base_fields(&self) -> &'static [&'static str] {
        &["title"]
    }

    fn listing_scope(&self, state: &AppState, _params: &Params) -> Result<ListingScope, ApiError> {
        Ok(ListingScope {
            collection: CollectionQuery::documents(),
            api_fields: state
                .fields()
                .api_fields(self.base_fields(), Some(Document::KIND)),
        })
    }

    fn detail_scope(&self, _state: &AppState) -> CollectionQuery {
        CollectionQuery::documents()
    }
}
