//! Static field registry.
//!
//! Declares, per content kind, which attribute names are exposable through
//! the API. The table is built once at process start and shared read-only;
//! kinds split into node kinds (addressable via the `type` parameter) and
//! related kinds (serialized inside child relations only).

use std::collections::HashMap;

struct KindEntry {
    fields: Vec<String>,
    node: bool,
}

/// Registry of exposable field names per content kind.
pub struct FieldRegistry {
    kinds: HashMap<String, KindEntry>,
}

impl FieldRegistry {
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            kinds: HashMap::new(),
        }
    }

    /// Declared field names for a kind, in declaration order.
    /// Unknown kinds yield an empty slice, not an error.
    pub fn fields_for(&self, kind: &str) -> &[String] {
        self.kinds
            .get(kind)
            .map(|entry| entry.fields.as_slice())
            .unwrap_or_default()
    }

    /// Whether a kind has any field declarations at all.
    pub fn has_fields(&self, kind: &str) -> bool {
        !self.fields_for(kind).is_empty()
    }

    /// Whether a kind is addressable through the `type` parameter.
    pub fn is_node_kind(&self, kind: &str) -> bool {
        self.kinds.get(kind).is_some_and(|entry| entry.node)
    }

    /// Endpoint base fields followed by the kind's declared fields,
    /// duplicates removed, order preserved.
    pub fn api_fields(&self, base: &[&str], kind: Option<&str>) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        for name in base {
            if !fields.iter().any(|f| f == name) {
                fields.push((*name).to_string());
            }
        }
        if let Some(kind) = kind {
            for name in self.fields_for(kind) {
                if !fields.iter().any(|f| f == name) {
                    fields.push(name.clone());
                }
            }
        }
        fields
    }
}

/// Builder assembling a [`FieldRegistry`] at startup.
pub struct FieldRegistryBuilder {
    kinds: HashMap<String, KindEntry>,
}

impl FieldRegistryBuilder {
    fn register(mut self, kind: &str, fields: &[&str], node: bool) -> Self {
        let mut deduped: Vec<String> = Vec::new();
        for name in fields {
            if !deduped.iter().any(|f| f == name) {
                deduped.push((*name).to_string());
            }
        }
        self.kinds.insert(
            kind.to_string(),
            KindEntry {
                fields: deduped,
                node,
            },
        );
        self
    }

    /// Declare a node kind (listable via the `type` parameter).
    pub fn node_kind(self, kind: &str, fields: &[&str]) -> Self {
        self.register(kind, fields, true)
    }

    /// Declare a related kind (child relation records only).
    pub fn related_kind(self, kind: &str, fields: &[&str]) -> Self {
        self.register(kind, fields, false)
    }

    pub fn build(self) -> FieldRegistry {
        FieldRegistry { kinds: self.kinds }
    }
}
