//! Full-text search backends.
//!
//! The query pipeline hands the search backend its current collection and a
//! free-text query; the backend returns a re-ranked, narrowed collection.
//! [`KeywordSearch`] is the default backend: AND-combined prefix matching
//! over titles and text attributes with a simple hit-count rank. Heavier
//! engines slot in behind the same trait.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::models::Record;
use crate::store::{CollectionQuery, ContentStore};

/// A search engine operating over a content collection.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Narrow `collection` to entities matching `query`, ranked by
    /// relevance. The returned collection's rank order supersedes any field
    /// ordering already applied.
    async fn search(&self, query: &str, collection: CollectionQuery)
        -> Result<CollectionQuery>;
}

/// Keyword search over titles and text attributes.
///
/// Every whitespace-separated term must prefix-match some word of the
/// entity's searchable text (case-insensitive). Rank is the total number of
/// word hits, ties resolved by the collection's prior order.
pub struct KeywordSearch {
    store: Arc<dyn ContentStore>,
}

impl KeywordSearch {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SearchBackend for KeywordSearch {
    async fn search(
        &self,
        query: &str,
        collection: CollectionQuery,
    ) -> Result<CollectionQuery> {
        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if terms.is_empty() {
            return Ok(collection.ranked(Vec::new()));
        }

        // Materialize the candidate set once; the collection carries no
        // pagination slice at this stage.
        let mut candidates = collection.clone();
        candidates.slice = None;
        let records = self.store.fetch(&candidates).await?;

        let mut scored: Vec<(i64, usize)> = records
            .iter()
            .filter_map(|record| score(record, &terms).map(|rank| (record.id(), rank)))
            .collect();
        // Stable by rank only, preserving prior order among equal ranks.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let ids: Vec<i64> = scored.iter().map(|(id, _)| *id).collect();
        debug!(query = %query, matches = ids.len(), "keyword search completed");

        Ok(collection.ranked(ids))
    }
}

/// Rank a record against the query terms; None when some term has no hit.
fn score(record: &Record, terms: &[String]) -> Option<usize> {
    let words = searchable_words(record);

    let mut rank = 0;
    for term in terms {
        let hits = words.iter().filter(|w| w.starts_with(term)).count();
        if hits == 0 {
            return None;
        }
        rank += hits;
    }
    Some(rank)
}

/// Lowercased words from the record's title and string attributes.
fn searchable_words(record: &Record) -> Vec<String> {
    let mut text = String::new();
    if let Some(Value::String(title)) = record.native("title") {
        text.push_str(&title);
    }

    let attrs = match record {
        Record::Page(p) => &p.attrs,
        Record::Media(m) => &m.attrs,
        Record::Document(d) => &d.attrs,
    };
    if let Some(object) = attrs.as_object() {
        for value in object.values() {
            if let Value::String(s) = value {
                text.push(' ');
                text.push_str(s);
            }
        }
    }

    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
