use serde_json::Value as JsonValue;

use crate::application::ports::link_document_store::{FieldValue, LinkDocumentStore};
use crate::application::use_cases::links::{LinkError, link_field};
use crate::domain::links::link_document::normalize_platform;

/// Field update without an existence check; the store decides what happens
/// when the document is absent.
pub struct UpdateLink<'a, S: LinkDocumentStore + ?Sized> {
    pub store: &'a S,
}

impl<'a, S: LinkDocumentStore + ?Sized> UpdateLink<'a, S> {
    pub async fn execute(&self, platform: &str, link: &str) -> Result<(), LinkError> {
        let platform = normalize_platform(platform);
        let value = FieldValue::Set(JsonValue::String(link.to_string()));
        self.store.update(&[(link_field(&platform), value)]).await?;
        Ok(())
    }
}
