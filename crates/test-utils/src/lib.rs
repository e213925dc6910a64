//! Vetrina test utilities.
//!
//! Builders for content fixtures used by integration tests: pages with
//! tree positions and child relations, media assets, and documents.

use serde_json::Value as JsonValue;

use vetrina_kernel::models::{ChildRelation, Document, MediaAsset, Page};

/// Create a test page with default values: live, unrestricted, no parent.
pub fn test_page(id: i64, page_type: &str, title: &str) -> TestPage {
    TestPage {
        page: Page {
            id,
            page_type: page_type.to_string(),
            title: title.to_string(),
            parent_id: None,
            live: true,
            restricted: false,
            attrs: serde_json::json!({}),
            children: Vec::new(),
        },
    }
}

/// A test page builder.
#[derive(Debug, Clone)]
pub struct TestPage {
    page: Page,
}

impl TestPage {
    /// Place the page under a parent.
    pub fn under(mut self, parent_id: i64) -> Self {
        self.page.parent_id = Some(parent_id);
        self
    }

    /// Mark the page as not live.
    pub fn unpublished(mut self) -> Self {
        self.page.live = false;
        self
    }

    /// Place the page in a private section.
    pub fn restricted(mut self) -> Self {
        self.page.restricted = true;
        self
    }

    /// Add a single extra attribute.
    pub fn with_attr(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.page.attrs.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    /// Add a one-level child relation.
    pub fn with_children(mut self, name: &str, kind: &str, records: Vec<JsonValue>) -> Self {
        self.page.children.push(ChildRelation {
            name: name.to_string(),
            kind: kind.to_string(),
            records,
        });
        self
    }

    pub fn build(self) -> Page {
        self.page
    }
}

/// Create a test media asset.
pub fn test_media(id: i64, title: &str, width: i64, height: i64) -> TestMedia {
    TestMedia {
        asset: MediaAsset {
            id,
            title: title.to_string(),
            width,
            height,
            file: format!("media/asset-{id}.jpg"),
            attrs: serde_json::json!({}),
        },
    }
}

/// A test media asset builder.
#[derive(Debug, Clone)]
pub struct TestMedia {
    asset: MediaAsset,
}

impl TestMedia {
    /// Set the storage path.
    pub fn with_file(mut self, file: &str) -> Self {
        self.asset.file = file.to_string();
        self
    }

    /// Add a single extra attribute.
    pub fn with_attr(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.asset.attrs.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    pub fn build(self) -> MediaAsset {
        self.asset
    }
}

/// Create a test document.
pub fn test_document(id: i64, title: &str) -> TestDocument {
    TestDocument {
        document: Document {
            id,
            title: title.to_string(),
            file: format!("documents/document-{id}.pdf"),
            attrs: serde_json::json!({}),
        },
    }
}

/// A test document builder.
#[derive(Debug, Clone)]
pub struct TestDocument {
    document: Document,
}

impl TestDocument {
    /// Set the storage path.
    pub fn with_file(mut self, file: &str) -> Self {
        self.document.file = file.to_string();
        self
    }

    /// Add a single extra attribute.
    pub fn with_attr(mut self, name: &str, value: JsonValue) -> Self {
        if let Some(obj) = self.document.attrs.as_object_mut() {
            obj.insert(name.to_string(), value);
        }
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}
