//! Vetrina Kernel Library
//!
//! Read-only content API: a declarative query pipeline (filter → scope →
//! order → search → paginate) over pages, media assets, and documents, with
//! field-level serialization driven by a static per-kind field registry.
//!
//! This library exposes kernel internals for integration testing and
//! embedding. The main entry point for running the server is the `vetrina`
//! binary.

pub mod api;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::pages::router())
        .merge(routes::media::router())
        .merge(routes::documents::router())
}
