//! The API layer: endpoint contract, query pipeline, and envelopes.

pub mod endpoint;
pub mod envelope;
pub mod pipeline;

mod documents;
mod media;
mod pages;

pub use documents::DocumentsEndpoint;
pub use endpoint::{ApiEndpoint, ListingScope, detail_view, listing_view};
pub use media::MediaEndpoint;
pub use pages::PagesEndpoint;
