use serde_json::Value as JsonValue;

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformLinkDto {
    /// Lowercased platform name.
    pub platform: String,
    pub link: JsonValue,
}
