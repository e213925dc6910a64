//! Field metadata and object serialization.

mod field_registry;
mod serializer;

pub use field_registry::{FieldRegistry, FieldRegistryBuilder};
pub use serializer::ObjectSerializer;

/// Built-in content model.
///
/// Deployments with their own kinds assemble a registry through
/// [`FieldRegistry::builder`] instead.
pub fn default_registry() -> FieldRegistry {
    FieldRegistry::builder()
        .node_kind("section", &[])
        .node_kind("article", &["body", "published", "contributors"])
        .related_kind("contributor", &["name", "role"])
        .build()
}
