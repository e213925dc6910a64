//! Document model (file attachment).

use serde_json::Value;

use super::path_basename;

/// An uploaded document.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: i64,

    /// Document title.
    pub title: String,

    /// Storage path of the underlying file.
    pub file: String,

    /// Extra attributes (JSON object).
    pub attrs: Value,
}

impl Document {
    /// Kind tag used for field registry lookups.
    pub const KIND: &'static str = "document";

    /// Native attribute lookup.
    pub fn native(&self, field: &str) -> Option<Value> {
        match field {
            "title" => Some(Value::String(self.title.clone())),
            _ => None,
        }
    }

    /// Computed properties, then the attrs object.
    pub fn attr(&self, field: &str) -> Option<Value> {
        match field {
            "filename" => Some(Value::String(path_basename(&self.file).to_string())),
            _ => self.attrs.get(field).cloned(),
        }
    }
}
