#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]
//! Common test utilities for integration tests.
//!
//! Tests drive the real router over an in-memory content store, so the
//! whole request path — routing, pipeline, serialization, envelopes — is
//! exercised exactly as in production, minus PostgreSQL.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vetrina_kernel::AppState;
use vetrina_kernel::content::FieldRegistry;
use vetrina_kernel::search::{KeywordSearch, SearchBackend};
use vetrina_kernel::store::ContentStore;
use vetrina_kernel::store::memory::MemoryStore;
use vetrina_test_utils::{test_document, test_media, test_page};

/// Test application wrapper using the real router and state.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(store: MemoryStore, registry: FieldRegistry, site_root: i64) -> Self {
        let store: Arc<dyn ContentStore> = Arc::new(store);
        let search: Arc<dyn SearchBackend> = Arc::new(KeywordSearch::new(store.clone()));
        let state = AppState::with_parts(store, search, Arc::new(registry), site_root);

        Self {
            router: vetrina_kernel::router().with_state(state),
        }
    }

    /// Issue a GET request against the router.
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

/// Collect a response body as JSON.
pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Extract the id sequence from a listing's collection array.
pub fn id_list(content: &serde_json::Value, collection: &str) -> Vec<i64> {
    content[collection]
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["id"].as_i64().unwrap())
        .collect()
}

/// Field registry shared by the integration fixtures.
pub fn fixture_registry() -> FieldRegistry {
    FieldRegistry::builder()
        .node_kind("section", &[])
        .node_kind("article", &["body", "published", "rating", "contributors"])
        .related_kind("contributor", &["name", "role"])
        .related_kind("media", &["caption"])
        .related_kind("document", &["filename"])
        .build()
}

/// Site tree fixture.
///
/// Visible pages under the site root (1): Home, About, News, and two
/// articles sharing a title so ordering ties are observable. Page 6 is
/// unpublished, page 7 restricted, page 8 a separate tree root.
pub fn site_store() -> MemoryStore {
    let mut store = MemoryStore::new();

    store.insert_page(test_page(1, "section", "Home").build());
    store.insert_page(test_page(2, "section", "About").under(1).build());
    store.insert_page(test_page(3, "section", "News").under(1).build());
    store.insert_page(
        test_page(4, "article", "News Update")
            .under(3)
            .with_attr("body", serde_json::json!("Welcome to the relaunch"))
            .with_attr("published", serde_json::json!("2014-01-05"))
            .with_attr("rating", serde_json::json!(5))
            .with_children(
                "contributors",
                "contributor",
                vec![
                    serde_json::json!({"name": "A. Writer", "role": "author", "email": "hidden@example.com"}),
                    serde_json::json!({"name": "B. Editor", "role": "editor"}),
                ],
            )
            .build(),
    );
    store.insert_page(
        test_page(5, "article", "News Update")
            .under(3)
            .with_attr("body", serde_json::json!("Quarterly figures are in"))
            .with_attr("published", serde_json::json!("2014-02-11"))
            .build(),
    );
    store.insert_page(test_page(6, "section", "Old Draft").under(1).unpublished().build());
    store.insert_page(test_page(7, "section", "Staff Area").under(1).restricted().build());
    store.insert_page(test_page(8, "section", "Elsewhere").build());

    store.insert_media(
        test_media(1, "Lighthouse", 640, 480)
            .with_file("media/lighthouse.jpg")
            .with_attr("caption", serde_json::json!("The lighthouse at dusk"))
            .build(),
    );
    store.insert_media(test_media(2, "Harbour", 1024, 768).build());
    store.insert_media(test_media(3, "Map", 300, 300).build());

    store
}

/// Document library fixture: twelve documents with known titles.
pub fn library_store() -> MemoryStore {
    let mut store = MemoryStore::new();

    let titles = [
        (1, "Pride and Prejudice"),
        (2, "James Joyce"),
        (3, "A Room with a View"),
        (4, "Moby-Dick"),
        (5, "The Great Gatsby"),
        (6, "Wuthering Heights"),
        (7, "Jane Eyre"),
        (8, "Middlemarch"),
        (9, "Little Women"),
        (10, "Dubliners"),
        (11, "Ulysses"),
        (12, "Bleak House"),
    ];
    for (id, title) in titles {
        store.insert_document(test_document(id, title).build());
    }

    store
}

/// App over the document library (pages and media empty).
pub fn library_app() -> TestApp {
    TestApp::new(library_store(), fixture_registry(), 1)
}

/// App over the site tree fixture.
pub fn site_app() -> TestApp {
    TestApp::new(site_store(), fixture_registry(), 1)
}
