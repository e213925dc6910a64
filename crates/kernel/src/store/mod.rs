//! Content store abstraction.
//!
//! The query pipeline never talks to a database directly. It accumulates
//! constraints into a [`CollectionQuery`] handle; a [`ContentStore`]
//! materializes the handle on `count`/`fetch`, so the total count and the
//! final page can share one evaluation where the backend supports it.

pub mod memory;
pub mod postgres;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Record;

/// Which entity table a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    Pages,
    Media,
    Documents,
}

/// Comparison operators for field filters.
///
/// `Contains`/`StartsWith` match case-insensitively. The integer operators
/// compare the integer interpretation of the stored value; entities whose
/// value is not an integer do not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
    Contains,
    StartsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

/// Filter value, typed by the operator that carries it.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
}

impl FilterValue {
    /// Text form used for equality and pattern operators.
    pub fn as_text(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Integer(i) => i.to_string(),
        }
    }

    /// Integer form used for comparison operators.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FilterValue::Integer(i) => Some(*i),
            FilterValue::Text(s) => s.parse().ok(),
        }
    }
}

/// A single field filter condition.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// Ordering specification.
///
/// `reverse` requests the reverse of the ascending-sorted sequence rather
/// than an independent descending sort; with duplicate keys the two differ,
/// and the reversed-ascending behavior is the documented contract.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub reverse: bool,
}

/// Half-open pagination window `[offset, offset + limit)`.
#[derive(Debug, Clone, Copy)]
pub struct Slice {
    pub offset: u64,
    pub limit: u64,
}

/// Accumulated constraints over a content collection.
///
/// Built up by the query pipeline and materialized by a [`ContentStore`].
/// Constraint application order at evaluation time: target and visibility,
/// tree scopes, field filters, ordering (or search rank, which supersedes
/// it), then the pagination slice.
#[derive(Debug, Clone)]
pub struct CollectionQuery {
    pub target: QueryTarget,

    /// Restrict pages to live, non-restricted ones.
    pub visible_only: bool,

    /// Restrict pages to the subtree rooted at this id (inclusive).
    pub ancestor: Option<i64>,

    /// Restrict pages to a single kind tag.
    pub page_type: Option<String>,

    /// Restrict pages to direct children of this id.
    pub parent: Option<i64>,

    pub filters: Vec<FieldFilter>,

    pub order: Option<OrderBy>,

    /// Search-ranked id sequence. When present it both narrows the
    /// collection and supplies the ordering, superseding `order`.
    pub ranked_ids: Option<Vec<i64>>,

    pub slice: Option<Slice>,
}

impl CollectionQuery {
    fn new(target: QueryTarget) -> Self {
        Self {
            target,
            visible_only: false,
            ancestor: None,
            page_type: None,
            parent: None,
            filters: Vec::new(),
            order: None,
            ranked_ids: None,
            slice: None,
        }
    }

    /// All pages, unscoped.
    pub fn pages() -> Self {
        Self::new(QueryTarget::Pages)
    }

    /// All media assets.
    pub fn media() -> Self {
        Self::new(QueryTarget::Media)
    }

    /// All documents.
    pub fn documents() -> Self {
        Self::new(QueryTarget::Documents)
    }

    /// Restrict pages to live, non-restricted ones.
    pub fn visible(mut self) -> Self {
        self.visible_only = true;
        self
    }

    /// Restrict pages to the subtree rooted at `root` (inclusive).
    pub fn within(mut self, root: i64) -> Self {
        self.ancestor = Some(root);
        self
    }

    /// Restrict pages to a single kind tag.
    pub fn of_type(mut self, page_type: &str) -> Self {
        self.page_type = Some(page_type.to_string());
        self
    }

    /// Restrict pages to direct children of `parent`.
    pub fn child_of(mut self, parent: i64) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add a field filter condition.
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sort ascending by `field`; `reverse` flips the sorted sequence.
    pub fn order_by(mut self, field: &str, reverse: bool) -> Self {
        self.order = Some(OrderBy {
            field: field.to_string(),
            reverse,
        });
        self
    }

    /// Pin the collection to a search-ranked id sequence.
    pub fn ranked(mut self, ids: Vec<i64>) -> Self {
        self.ranked_ids = Some(ids);
        self
    }

    /// Apply the pagination window.
    pub fn sliced(mut self, offset: u64, limit: u64) -> Self {
        self.slice = Some(Slice { offset, limit });
        self
    }
}

/// Collection query primitives offered by a content backend.
///
/// Implementations must apply every constraint carried by the query; the
/// pipeline relies on `count` seeing the collection exactly as `fetch`
/// does, minus the slice.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Count matching entities, ignoring any pagination slice.
    async fn count(&self, query: &CollectionQuery) -> Result<u64>;

    /// Fetch matching entities in query order, honoring the slice.
    async fn fetch(&self, query: &CollectionQuery) -> Result<Vec<Record>>;

    /// Fetch a single entity by id within the query's scope constraints.
    async fn get(&self, query: &CollectionQuery, id: i64) -> Result<Option<Record>>;

    /// Whether a page with this id exists at all (unscoped).
    async fn page_exists(&self, id: i64) -> Result<bool>;

    /// Whether the backend is reachable.
    async fn healthy(&self) -> bool;
}
