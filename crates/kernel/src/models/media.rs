//! Media asset model.

use serde_json::Value;

use super::path_basename;

/// An image or other dimensioned media asset.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaAsset {
    /// Store-assigned identifier.
    pub id: i64,

    /// Asset title.
    pub title: String,

    /// Pixel width.
    pub width: i64,

    /// Pixel height.
    pub height: i64,

    /// Storage path of the underlying file.
    pub file: String,

    /// Extra attributes (JSON object).
    pub attrs: Value,
}

impl MediaAsset {
    /// Kind tag used for field registry lookups.
    pub const KIND: &'static str = "media";

    /// Native attribute lookup.
    pub fn native(&self, field: &str) -> Option<Value> {
        match field {
            "title" => Some(Value::String(self.title.clone())),
            "width" => Some(Value::from(self.width)),
            "height" => Some(Value::from(self.height)),
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
