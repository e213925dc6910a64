//! Object serializer.
//!
//! Turns an entity plus a field selection into an ordered JSON document:
//! `id` first, an optional `meta` block, then the selected fields. Each
//! field name is resolved against an ordered resolver sequence — declared
//! child relation, native attribute, generic attribute/property — and names
//! resolving to nothing are silently omitted (this shapes `all_fields`
//! output and is part of the contract).

use serde_json::{Map, Value};

use crate::models::{ChildRelation, Record};

use super::FieldRegistry;

/// Serializer resolving field names through the registry.
pub struct ObjectSerializer<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> ObjectSerializer<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    /// Serialize one record.
    ///
    /// `requested = None` means all declared fields (`api_fields` as-is);
    /// otherwise the requested names are narrowed to declared ones,
    /// preserving request order. `metadata` is emitted as a `meta` block
    /// only when non-empty.
    pub fn serialize(
        &self,
        record: &Record,
        api_fields: &[String],
        requested: Option<&[String]>,
        metadata: Map<String, Value>,
    ) -> Map<String, Value> {
        let mut doc = Map::new();
        doc.insert("id".to_string(), Value::from(record.id()));

        if !metadata.is_empty() {
            doc.insert("meta".to_string(), Value::Object(metadata));
        }

        let selected: Vec<&String> = match requested {
            None => api_fields.iter().collect(),
            Some(requested) => requested
                .iter()
                .filter(|name| api_fields.contains(name))
                .collect(),
        };

        for field in selected {
            if let Some(value) = self.resolve(record, field) {
                doc.insert(field.clone(), value);
            }
        }

        doc
    }

    /// Resolve one field name; first match wins, None means omit.
    fn resolve(&self, record: &Record, field: &str) -> Option<Value> {
        if let Some(relation) = record.child_relation(field) {
            if self.registry.has_fields(&relation.kind) {
                return Some(self.serialize_relation(relation));
            }
        }

        if let Some(value) = record.native(field) {
            return Some(value);
        }

        record.attr(field).map(coerce_text)
    }

    /// Serialize a child relation as a sequence of nested documents built
    /// from the related kind's own declarations (no id, no meta).
    fn serialize_relation(&self, relation: &ChildRelation) -> Value {
        let fields = self.registry.fields_for(&relation.kind);

        let documents: Vec<Value> = relation
            .records
            .iter()
            .map(|record| {
                let mut doc = Map::new();
                for field in fields {
                    if let Some(value) = record.get(field) {
                        doc.insert(field.clone(), coerce_text(value.clone()));
                    }
                }
                Value::Object(doc)
            })
            .collect();

        Value::Array(documents)
    }
}

/// Text coercion for generic attribute values: non-string scalars pass
/// through unchanged, compound values flatten to their JSON text.
fn coerce_text(value: Value) -> Value {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value,
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::Page;

    fn registry() -> FieldRegistry {
        FieldRegistry::builder()
            .node_kind("article", &["body", "published", "rating", "tags", "contributors"])
            .related_kind("contributor", &["name", "role"])
            .build()
    }

    fn article() -> Record {
        Record::Page(Page {
            id: 4,
            page_type: "article".to_string(),
            title: "First Post".to_string(),
            parent_id: Some(3),
            live: true,
            restricted: false,
            attrs: serde_json::json!({
                "body": "Hello world",
                "published": "2014-02-01",
                "rating": 5,
                "tags": ["a", "b"],
            }),
            children: vec![ChildRelation {
                name: "contributors".to_string(),
                kind: "contributor".to_string(),
                records: vec![
                    serde_json::json!({"name": "A. Writer", "role": "author", "email": "hidden"}),
                    serde_json::json!({"name": "B. Editor", "role": "editor"}),
                ],
            }],
        })
    }

    fn api_fields(registry: &FieldRegistry) -> Vec<String> {
        registry.api_fields(&["title"], Some("article"))
    }

    #[test]
    fn id_is_always_first() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let doc = serializer.serialize(&article(), &api_fields(&registry), None, Map::new());

        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys[0], "id");
        assert_eq!(doc["id"], Value::from(4));
    }

    #[test]
    fn empty_metadata_is_omitted_entirely() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let doc = serializer.serialize(&article(), &api_fields(&registry), None, Map::new());
        assert!(!doc.contains_key("meta"));
    }

    #[test]
    fn metadata_follows_id() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let mut meta = Map::new();
        meta.insert("type".to_string(), Value::String("article".into()));
        let doc = serializer.serialize(&article(), &api_fields(&registry), None, meta);

        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys[1], "meta");
        assert_eq!(doc["meta"]["type"], "article");
    }

    #[test]
    fn all_fields_covers_full_registry() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let doc = serializer.serialize(&article(), &api_fields(&registry), None, Map::new());

        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(
            keys,
            vec!["id", "title", "body", "published", "rating", "tags", "contributors"]
        );
    }

    #[test]
    fn requested_fields_narrow_to_declared_in_request_order() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let requested = vec![
            "body".to_string(),
            "secret".to_string(),
            "title".to_string(),
        ];
        let doc = serializer.serialize(
            &article(),
            &api_fields(&registry),
            Some(&requested),
            Map::new(),
        );

        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, vec!["id", "body", "title"]);
    }

    #[test]
    fn declared_but_unresolvable_field_is_silently_omitted() {
        let registry = FieldRegistry::builder()
            .node_kind("article", &["body", "nonexistent"])
            .build();
        let serializer = ObjectSerializer::new(&registry);
        let fields = registry.api_fields(&["title"], Some("article"));
        let doc = serializer.serialize(&article(), &fields, None, Map::new());

        assert!(doc.contains_key("body"));
        assert!(!doc.contains_key("nonexistent"));
    }

    #[test]
    fn child_relation_uses_child_declarations_only() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let doc = serializer.serialize(&article(), &api_fields(&registry), None, Map::new());

        let contributors = doc["contributors"].as_array().unwrap();
        assert_eq!(contributors.len(), 2);
        // Declared child fields only — no id, no meta, no undeclared attrs.
        assert_eq!(
            contributors[0],
            serde_json::json!({"name": "A. Writer", "role": "author"})
        );
        assert_eq!(
            contributors[1],
            serde_json::json!({"name": "B. Editor", "role": "editor"})
        );
    }

    #[test]
    fn relation_with_undeclared_kind_falls_through_to_attrs() {
        let registry = FieldRegistry::builder()
            .node_kind("article", &["contributors"])
            .build();
        let serializer = ObjectSerializer::new(&registry);
        let fields = registry.api_fields(&["title"], Some("article"));
        let doc = serializer.serialize(&article(), &fields, None, Map::new());

        // "contributor" has no declarations, and "contributors" is not an
        // attr either, so the field drops out.
        assert!(!doc.contains_key("contributors"));
    }

    #[test]
    fn attrs_coerce_compound_values_to_text() {
        let registry = registry();
        let serializer = ObjectSerializer::new(&registry);
        let doc = serializer.serialize(&article(), &api_fields(&registry), None, Map::new());

        // Non-string scalars pass through unchanged.
        assert_eq!(doc["rating"], Value::from(5));
        // Compound values flatten to JSON text.
        assert_eq!(doc["tags"], Value::String(r#"["a","b"]"#.to_string()));
    }
}
