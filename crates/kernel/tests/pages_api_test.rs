#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Pages listing and detail API tests.
//!
//! Runs against a small site tree: visible sections and two articles that
//! share a title (so ordering-tie behavior is observable), plus an
//! unpublished page, a restricted page, and a second tree outside the
//! served site root.

use axum::http::StatusCode;

mod common;
use common::{id_list, response_json, site_app};

// ---------------------------------------------------------------------------
// Base collection and visibility
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_serves_visible_pages_in_site_subtree() {
    let content = response_json(site_app().get("/api/v1/pages").await).await;

    // Unpublished (6), restricted (7) and out-of-site (8) pages are absent.
    assert_eq!(id_list(&content, "pages"), vec![1, 2, 3, 4, 5]);
    assert_eq!(content["meta"]["total_count"], 5);
}

#[tokio::test]
async fn listing_documents_carry_type_metadata_but_no_parent() {
    let content = response_json(site_app().get("/api/v1/pages").await).await;
    assert_eq!(
        content["pages"][1],
        serde_json::json!({
            "id": 2,
            "meta": {"type": "section"},
            "title": "About",
        })
    );
}

#[tokio::test]
async fn total_count_is_independent_of_pagination() {
    let content = response_json(site_app().get("/api/v1/pages?limit=2").await).await;
    assert_eq!(content["meta"]["total_count"], 5);
    assert_eq!(content["pages"].as_array().unwrap().len(), 2);

    let content = response_json(site_app().get("/api/v1/pages?offset=4").await).await;
    assert_eq!(content["meta"]["total_count"], 5);
    assert_eq!(id_list(&content, "pages"), vec![5]);
}

// ---------------------------------------------------------------------------
// Type resolution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn type_filter_narrows_to_kind() {
    let content = response_json(site_app().get("/api/v1/pages?type=article").await).await;
    assert_eq!(id_list(&content, "pages"), vec![4, 5]);
}

#[tokio::test]
async fn unknown_type_gives_404() {
    let response = site_app().get("/api/v1/pages?type=event").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let content = response_json(response).await;
    assert_eq!(
        content,
        serde_json::json!({"message": "type 'event' does not exist"})
    );
}

#[tokio::test]
async fn related_kinds_are_not_listable_types() {
    let response = site_app().get("/api/v1/pages?type=contributor").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Field filtering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn title_filter_returns_matching_ids() {
    let content = response_json(site_app().get("/api/v1/pages?title=About").await).await;
    assert_eq!(id_list(&content, "pages"), vec![2]);

    let content =
        response_json(site_app().get("/api/v1/pages?title=News%20Update").await).await;
    assert_eq!(id_list(&content, "pages"), vec![4, 5]);
}

#[tokio::test]
async fn kind_fields_are_filterable_only_with_type() {
    // Without a type the effective field set is just the base fields.
    let response = site_app().get("/api/v1/pages?body__contains=relaunch").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let content = response_json(response).await;
    assert_eq!(
        content,
        serde_json::json!({"message": "cannot filter by 'body' (unknown field)"})
    );

    let content = response_json(
        site_app()
            .get("/api/v1/pages?type=article&body__contains=relaunch")
            .await,
    )
    .await;
    assert_eq!(id_list(&content, "pages"), vec![4]);
}

#[tokio::test]
async fn unknown_filter_field_gives_error() {
    let response = site_app().get("/api/v1/pages?not_a_field=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// child_of scope filtering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn child_of_restricts_to_direct_children() {
    let content = response_json(site_app().get("/api/v1/pages?child_of=3").await).await;
    assert_eq!(id_list(&content, "pages"), vec![4, 5]);
}

#[tokio::test]
async fn child_of_still_excludes_invisible_children() {
    let content = response_json(site_app().get("/api/v1/pages?child_of=1").await).await;
    assert_eq!(id_list(&content, "pages"), vec![2, 3]);
}

#[tokio::test]
async fn child_of_unknown_parent_gives_404() {
    let response = site_app().get("/api/v1/pages?child_of=999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let content = response_json(response).await;
    assert_eq!(
        content,
        serde_json::json!({"message": "parent page does not exist"})
    );
}

#[tokio::test]
async fn child_of_non_integer_gives_400() {
    let response = site_app().get("/api/v1/pages?child_of=abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let content = response_json(response).await;
    assert_eq!(
        content,
        serde_json::json!({"message": "child_of must be a positive integer"})
    );
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ordering_by_title_sorts_ascending() {
    let content = response_json(site_app().get("/api/v1/pages?order=title").await).await;
    assert_eq!(id_list(&content, "pages"), vec![2, 1, 3, 4, 5]);
}

#[tokio::test]
async fn ordering_backwards_reverses_the_ascending_sequence() {
    // Pages 4 and 5 share a title. Reversing the stable ascending sort
    // puts 5 before 4; a stable descending sort would keep 4 first. The
    // reversed sequence is the documented behavior.
    let content = response_json(site_app().get("/api/v1/pages?order=-title").await).await;
    assert_eq!(id_list(&content, "pages"), vec![5, 4, 3, 1, 2]);
}

#[tokio::test]
async fn ordering_by_kind_field_requires_type() {
    let response = site_app().get("/api/v1/pages?order=published").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let content = response_json(
        site_app()
            .get("/api/v1/pages?type=article&order=-published")
            .await,
    )
    .await;
    assert_eq!(id_list(&content, "pages"), vec![5, 4]);
}

#[tokio::test]
async fn ordering_by_id_is_always_permitted() {
    let content = response_json(site_app().get("/api/v1/pages?order=-id").await).await;
    assert_eq!(id_list(&content, "pages"), vec![5, 4, 3, 2, 1]);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_narrows_to_matching_pages() {
    let content = response_json(site_app().get("/api/v1/pages?search=relaunch").await).await;
    assert_eq!(id_list(&content, "pages"), vec![4]);
    assert_eq!(content["meta"]["total_count"], 1);
}

#[tokio::test]
async fn search_composes_with_type_filter() {
    let content = response_json(
        site_app()
            .get("/api/v1/pages?type=article&search=quarterly")
            .await,
    )
    .await;
    assert_eq!(id_list(&content, "pages"), vec![5]);
}

// ---------------------------------------------------------------------------
// Field selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fields_parameter_respects_per_kind_declarations() {
    let content =
        response_json(site_app().get("/api/v1/pages?fields=title,body").await).await;

    // Sections have no declared body, so only articles carry one.
    let pages = content["pages"].as_array().unwrap();
    assert!(pages[1].get("body").is_none());
    assert_eq!(pages[3]["body"], "Welcome to the relaunch");
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn detail_serializes_all_fields_with_metadata() {
    let response = site_app().get("/api/v1/pages/4").await;
    assert_eq!(response.status(), StatusCode::OK);

    let content = response_json(response).await;
    assert_eq!(
        content,
        serde_json::json!({
            "id": 4,
            "meta": {"type": "article", "parent_id": 3},
            "title": "News Update",
            "body": "Welcome to the relaunch",
            "published": "2014-01-05",
            "rating": 5,
            "contributors": [
                {"name": "A. Writer", "role": "author"},
                {"name": "B. Editor", "role": "editor"},
            ],
        })
    );
}

#[tokio::test]
async fn detail_of_root_page_has_null_parent() {
    let content = response_json(site_app().get("/api/v1/pages/1").await).await;
    assert_eq!(content["meta"]["parent_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn detail_of_invisible_or_foreign_pages_gives_404() {
    for id in [6, 7, 8, 999] {
        let response = site_app().get(&format!("/api/v1/pages/{id}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "page {id}");

        let content = response_json(response).await;
        assert_eq!(content, serde_json::json!({"message": "page not found"}));
    }
}
