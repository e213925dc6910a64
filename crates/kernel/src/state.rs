//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::content::{self, FieldRegistry};
use crate::db;
use crate::search::{KeywordSearch, SearchBackend};
use crate::store::ContentStore;
use crate::store::postgres::PgStore;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Content store the pipeline materializes queries against.
    store: Arc<dyn ContentStore>,

    /// Full-text search backend.
    search: Arc<dyn SearchBackend>,

    /// Static field registry (built once at startup).
    fields: Arc<FieldRegistry>,

    /// Root page of the served site; page listings and detail lookups are
    /// scoped to its subtree.
    site_root: i64,
}

impl AppState {
    /// Create application state backed by PostgreSQL.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;

        let store: Arc<dyn ContentStore> = Arc::new(PgStore::new(pool));
        let search: Arc<dyn SearchBackend> = Arc::new(KeywordSearch::new(store.clone()));
        let fields = Arc::new(content::default_registry());

        info!(site_root = config.site_root_page, "application state initialized");

        Ok(Self::with_parts(
            store,
            search,
            fields,
            config.site_root_page,
        ))
    }

    /// Assemble state from explicit collaborators (embedding and tests).
    pub fn with_parts(
        store: Arc<dyn ContentStore>,
        search: Arc<dyn SearchBackend>,
        fields: Arc<FieldRegistry>,
        site_root: i64,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                search,
                fields,
                site_root,
            }),
        }
    }

    /// Get the content store.
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.inner.store
    }

    /// Get the search backend.
    pub fn search(&self) -> &Arc<dyn SearchBackend> {
        &self.inner.search
    }

    /// Get the field registry.
    pub fn fields(&self) -> &FieldRegistry {
        &self.inner.fields
    }

    /// Get the site root page id.
    pub fn site_root(&self) -> i64 {
        self.inner.site_root
    }

    /// Check if the content store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.inner.store.healthy().await
    }
}
