//! Page model (generic content node).
//!
//! Pages form a tree via `parent_id` and carry a kind tag (`page_type`)
//! that selects their declared field set. Extra attributes live in an
//! `attrs` JSON object; one-level child relations are carried alongside as
//! named record sequences.

use serde_json::Value;

/// A content node in the site tree.
#[derive(Debug, Clone)]
pub struct Page {
    /// Store-assigned identifier.
    pub id: i64,

    /// Kind tag (machine name, e.g. "article").
    pub page_type: String,

    /// Page title.
    pub title: String,

    /// Parent page, None for tree roots.
    pub parent_id: Option<i64>,

    /// Whether the page is currently live.
    pub live: bool,

    /// Whether the page sits inside a private section.
    pub restricted: bool,

    /// Extra attributes (JSON object).
    pub attrs: Value,

    /// One-level child relations, in declaration order.
    pub children: Vec<ChildRelation>,
}

/// A named one-level child relation on a page.
#[derive(Debug, Clone)]
pub struct ChildRelation {
    /// Relation name as exposed through the field registry.
    pub name: String,

    /// Kind tag of the related records.
    pub kind: String,

    /// Ordered child records, each a JSON object of attributes.
    pub records: Vec<Value>,
}

impl Page {
    /// Whether this page is visible to anonymous API consumers.
    pub fn is_visible(&self) -> bool {
        self.live && !self.restricted
    }

    /// Native attribute lookup.
    pub fn native(&self, field: &str) -> Option<Value> {
        match field {
            "title" => Some(Value::String(self.title.clone())),
            _ => None,
        }
    }

    /// Generic attribute lookup against the attrs object.
    pub fn attr(&self, field: &str) -> Option<Value> {
        self.attrs.get(field).cloned()
    }

    /// Look up a child relation by name.
    pub fn child_relation(&self, name: &str) -> Option<&ChildRelation> {
        self.children.iter().find(|rel| rel.name == name)
    }
}
