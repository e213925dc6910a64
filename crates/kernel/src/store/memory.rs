//! In-memory content store.
//!
//! Backs the integration test suite and embedded deployments. Evaluation
//! fully materializes the matching set once; `count` and `fetch` therefore
//! share identical semantics by construction.

use std::cmp::Ordering;
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Document, MediaAsset, Page, Record};

use super::{CollectionQuery, ContentStore, FieldFilter, FilterOperator, QueryTarget};

/// Content store holding all entities in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: Vec<Page>,
    media: Vec<MediaAsset>,
    documents: Vec<Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn insert_media(&mut self, asset: MediaAsset) {
        self.media.push(asset);
    }

    pub fn insert_document(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Whether `id` sits in the subtree rooted at `root` (inclusive).
    fn in_subtree(&self, id: i64, root: i64) -> bool {
        let parents: HashMap<i64, Option<i64>> =
            self.pages.iter().map(|p| (p.id, p.parent_id)).collect();

        let mut current = Some(id);
        // Hop budget bounds traversal even if the stored tree has a cycle.
        for _ in 0..=self.pages.len() {
            match current {
                Some(node) if node == root => return true,
                Some(node) => current = parents.get(&node).copied().flatten(),
                None => return false,
            }
        }
        false
    }

    /// All records matching the query's scope and filter constraints,
    /// in insertion order, ignoring ranking/ordering/slicing.
    fn matching(&self, query: &CollectionQuery) -> Vec<Record> {
        match query.target {
            QueryTarget::Pages => self
                .pages
                .iter()
                .filter(|p| !query.visible_only || p.is_visible())
                .filter(|p| query.ancestor.is_none_or(|root| self.in_subtree(p.id, root)))
                .filter(|p| {
                    query
                        .page_type
                        .as_deref()
                        .is_none_or(|t| p.page_type == t)
                })
                .filter(|p| query.parent.is_none_or(|id| p.parent_id == Some(id)))
                .map(|p| Record::Page(p.clone()))
                .filter(|r| filters_match(r, &query.filters))
                .collect(),
            QueryTarget::Media => self
                .media
                .iter()
                .map(|m| Record::Media(m.clone()))
                .filter(|r| filters_match(r, &query.filters))
                .collect(),
            QueryTarget::Documents => self
                .documents
                .iter()
                .map(|d| Record::Document(d.clone()))
                .filter(|r| filters_match(r, &query.filters))
                .collect(),
        }
    }

    /// Matching records in final order, before the pagination slice.
    fn evaluate(&self, query: &CollectionQuery) -> Vec<Record> {
        let mut records = self.matching(query);

        if let Some(ranked) = &query.ranked_ids {
            // Rank order supersedes any field ordering.
            let positions: HashMap<i64, usize> =
                ranked.iter().enumerate().map(|(i, id)| (*id, i)).collect();
            records.retain(|r| positions.contains_key(&r.id()));
            records.sort_by_key(|r| positions.get(&r.id()).copied().unwrap_or(usize::MAX));
            return records;
        }

        match &query.order {
            Some(order) => {
                // Stable ascending sort; `reverse` flips the sorted sequence
                // afterwards, which with duplicate keys is deliberately not
                // the same as a descending sort.
                records.sort_by(|a, b| {
                    cmp_values(&field_value(a, &order.field), &field_value(b, &order.field))
                });
                if order.reverse {
                    records.reverse();
                }
            }
            None => records.sort_by_key(Record::id),
        }

        records
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn count(&self, query: &CollectionQuery) -> Result<u64> {
        Ok(self.evaluate(query).len() as u64)
    }

    async fn fetch(&self, query: &CollectionQuery) -> Result<Vec<Record>> {
        let records = self.evaluate(query);

        let Some(slice) = query.slice else {
            return Ok(records);
        };
        Ok(records
            .into_iter()
            .skip(usize::try_from(slice.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(slice.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn get(&self, query: &CollectionQuery, id: i64) -> Result<Option<Record>> {
        Ok(self.matching(query).into_iter().find(|r| r.id() == id))
    }

    async fn page_exists(&self, id: i64) -> Result<bool> {
        Ok(self.pages.iter().any(|p| p.id == id))
    }

    async fn healthy(&self) -> bool {
        true
    }
}

fn filters_match(record: &Record, filters: &[FieldFilter]) -> bool {
    filters.iter().all(|f| {
        field_value(record, &f.field)
            .map(|v| filter_matches(&v, f))
            .unwrap_or(false)
    })
}

fn filter_matches(value: &Value, filter: &FieldFilter) -> bool {
    match filter.operator {
        FilterOperator::Equals => value_text(value) == filter.value.as_text(),
        FilterOperator::Contains => value_text(value)
            .to_lowercase()
            .contains(&filter.value.as_text().to_lowercase()),
        FilterOperator::StartsWith => value_text(value)
            .to_lowercase()
            .starts_with(&filter.value.as_text().to_lowercase()),
        FilterOperator::GreaterThan => int_cmp(value, filter).is_some_and(Ordering::is_gt),
        FilterOperator::LessThan => int_cmp(value, filter).is_some_and(Ordering::is_lt),
        FilterOperator::GreaterOrEqual => int_cmp(value, filter).is_some_and(Ordering::is_ge),
        FilterOperator::LessOrEqual => int_cmp(value, filter).is_some_and(Ordering::is_le),
    }
}

/// Compare the integer interpretations of the stored value and the filter
/// value; None when either is not an integer.
fn int_cmp(value: &Value, filter: &FieldFilter) -> Option<Ordering> {
    let stored = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }?;
    Some(stored.cmp(&filter.value.as_i64()?))
}

/// Resolve a field for filtering/ordering: id, then native, then attrs.
fn field_value(record: &Record, field: &str) -> Option<Value> {
    if field == "id" {
        return Some(Value::from(record.id()));
    }
    record.native(field).or_else(|| record.attr(field))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Total order over optional JSON values: missing first, then by type
/// class (null, bool, number, string, other), then within class.
fn cmp_values(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            _ => class_rank(a).cmp(&class_rank(b)),
        },
    }
}

fn class_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
