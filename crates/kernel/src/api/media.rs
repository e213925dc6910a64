//! Media endpoint.
//!
//! Serves all media assets; no tree scoping and no metadata block. The
//! dimension fields are part of the endpoint's base field set.

use crate::error::ApiError;
use crate::models::MediaAsset;
use crate::state::AppState;
use crate::store::CollectionQuery;

use super::endpoint::{ApiEndpoint, ListingScope};
use super::pipeline::Params;

pub struct MediaEndpoint;

impl ApiEndpoint for MediaEndpoint {
    fn collection_name(&self) -> &'static str {
        "media"
    }

    fn entity_name(&self) -> &'static str {
        "media asset"
    }

    fn base_fields(&self) -> &'static [&'static str] {
        &["title", "width", "height"]
    }

    fn listing_scope(&self, state: &AppState, _params: &Params) -> Result<ListingScope, ApiError> {
        Ok(ListingScope {
            collection: CollectionQuery::media(),
            api_fields: state
                .fields()
                .api_fields(self.base_fields(), Some(MediaAsset::KIND)),
        })
    }

    fn detail_scope(&self, _state: &AppState) -> CollectionQuery {
        CollectionQuery::media()
    }
}
