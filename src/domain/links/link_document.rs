use serde_json::{Map, Value as JsonValue};

/// Name of the map field holding platform -> link entries.
pub const LINKS_FIELD: &str = "social_media_links";

/// Platform names are case-insensitive; storage and lookup use lowercase.
pub fn normalize_platform(platform: &str) -> String {
    platform.to_lowercase()
}

/// A stored link only counts as present when it is truthy: null, `false`,
/// zero and the empty string read back as missing.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Snapshot of the link document as read from the store.
#[derive(Debug, Clone, Default)]
pub struct LinkDocument {
    data: Map<String, JsonValue>,
}

impl LinkDocument {
    pub fn new(data: Map<String, JsonValue>) -> Self {
        Self { data }
    }

    /// Initial contents for a document that does not exist yet.
    pub fn with_single_link(platform: &str, link: JsonValue) -> Self {
        let mut links = Map::new();
        links.insert(platform.to_string(), link);
        let mut data = Map::new();
        data.insert(LINKS_FIELD.to_string(), JsonValue::Object(links));
        Self { data }
    }

    pub fn data(&self) -> &Map<String, JsonValue> {
        &self.data
    }

    pub fn into_data(self) -> Map<String, JsonValue> {
        self.data
    }

    // A missing or non-map links field behaves like an empty map.
    pub fn links(&self) -> Option<&Map<String, JsonValue>> {
        self.data.get(LINKS_FIELD).and_then(JsonValue::as_object)
    }

    pub fn link_for(&self, platform: &str) -> Option<&JsonValue> {
        self.links()
            .and_then(|links| links.get(platform))
            .filter(|v| is_truthy(v))
    }
}
