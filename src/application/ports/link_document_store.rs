use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};

pub type DocumentData = Map<String, JsonValue>;

/// Path to a (possibly nested) field of a document. Segments are literal map
/// keys; a dot inside a segment does not introduce nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Writes `value` at this path, creating (or replacing non-map)
    /// intermediate entries.
    pub fn set_in(&self, data: &mut DocumentData, value: JsonValue) {
        let Some((last, parents)) = self.0.split_last() else {
            return;
        };
        let mut current = data;
        for seg in parents {
            let entry = current
                .entry(seg.clone())
                .or_insert_with(|| JsonValue::Object(Map::new()));
            if !entry.is_object() {
                *entry = JsonValue::Object(Map::new());
            }
            current = match entry {
                JsonValue::Object(map) => map,
                _ => return,
            };
        }
        current.insert(last.clone(), value);
    }

    /// Removes the field at this path. Missing intermediates are a no-op.
    pub fn remove_from(&self, data: &mut DocumentData) -> Option<JsonValue> {
        let (last, parents) = self.0.split_last()?;
        let mut current = data;
        for seg in parents {
            current = current.get_mut(seg)?.as_object_mut()?;
        }
        current.remove(last)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Set(JsonValue),
    /// Sentinel: remove the field from the document.
    Delete,
}

#[async_trait]
pub trait LinkDocumentStore: Send + Sync {
    /// Returns `None` when the document does not exist.
    async fn get(&self) -> anyhow::Result<Option<DocumentData>>;

    /// Creates the document or replaces its contents entirely.
    async fn set(&self, data: &DocumentData) -> anyhow::Result<()>;

    /// Merges the given fields into an existing document. Fails when the
    /// document does not exist.
    async fn update(&self, fields: &[(FieldPath, FieldValue)]) -> anyhow::Result<()>;
}
