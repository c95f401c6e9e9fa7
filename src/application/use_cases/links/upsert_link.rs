use serde_json::Value as JsonValue;

use crate::application::ports::link_document_store::{FieldValue, LinkDocumentStore};
use crate::application::use_cases::links::{LinkError, link_field};
use crate::domain::links::link_document::{LinkDocument, normalize_platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document did not exist and was created with this single link.
    Created,
    Updated,
}

/// Adds or replaces a link, creating the document on first use.
pub struct UpsertLink<'a, S: LinkDocumentStore + ?Sized> {
    pub store: &'a S,
}

impl<'a, S: LinkDocumentStore + ?Sized> UpsertLink<'a, S> {
    pub async fn execute(&self, platform: &str, link: &str) -> Result<UpsertOutcome, LinkError> {
        let platform = normalize_platform(platform);
        let link = JsonValue::String(link.to_string());
        if self.store.get().await?.is_some() {
            self.store
                .update(&[(link_field(&platform), FieldValue::Set(link))])
                .await?;
            Ok(UpsertOutcome::Updated)
        } else {
            let doc = LinkDocument::with_single_link(&platform, link);
            self.store.set(doc.data()).await?;
            Ok(UpsertOutcome::Created)
        }
    }
}
