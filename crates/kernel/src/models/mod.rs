//! Content entity models.
//!
//! Entities are owned and mutated entirely by the backing store; this layer
//! only reads and serializes them. Each kind exposes the same small lookup
//! surface the serializer resolves field names against: native attributes,
//! then generic attributes/computed properties, plus (for pages) named
//! one-level child relations.

mod document;
mod media;
mod page;

pub use document::Document;
pub use media::MediaAsset;
pub use page::{ChildRelation, Page};

use serde_json::Value;

/// A record returned by a store query. One variant per content kind.
#[derive(Debug, Clone)]
pub enum Record {
    Page(Page),
    Media(MediaAsset),
    Document(Document),
}

impl Record {
    /// Store-assigned identifier.
    pub fn id(&self) -> i64 {
        match self {
            Record::Page(p) => p.id,
            Record::Media(m) => m.id,
            Record::Document(d) => d.id,
        }
    }

    /// Kind tag used for field registry lookups.
    pub fn kind(&self) -> &str {
        match self {
            Record::Page(p) => &p.page_type,
            Record::Media(_) => MediaAsset::KIND,
            Record::Document(_) => Document::KIND,
        }
    }

    /// Native attribute lookup (passed through unchanged by the serializer).
    pub fn native(&self, field: &str) -> Option<Value> {
        match self {
            Record::Page(p) => p.native(field),
            Record::Media(m) => m.native(field),
            Record::Document(d) => d.native(field),
        }
    }

    /// Generic attribute or computed property lookup.
    pub fn attr(&self, field: &str) -> Option<Value> {
        match self {
            Record::Page(p) => p.attr(field),
            Record::Media(m) => m.attr(field),
            Record::Document(d) => d.attr(field),
        }
    }

    /// Named one-level child relation (pages only).
    pub fn child_relation(&self, name: &str) -> Option<&ChildRelation> {
        match self {
            Record::Page(p) => p.child_relation(name),
            _ => None,
        }
    }
}

/// Extract the basename of a storage path for `filename` properties.
pub(crate) fn path_basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
