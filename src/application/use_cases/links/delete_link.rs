use crate::application::ports::link_document_store::{FieldValue, LinkDocumentStore};
use crate::application::use_cases::links::{LinkError, link_field, load_document};
use crate::domain::links::link_document::normalize_platform;

pub struct DeleteLink<'a, S: LinkDocumentStore + ?Sized> {
    pub store: &'a S,
}

impl<'a, S: LinkDocumentStore + ?Sized> DeleteLink<'a, S> {
    /// Removes one entry from the links map. The document itself stays.
    pub async fn execute(&self, platform: &str) -> Result<(), LinkError> {
        let platform = normalize_platform(platform);
        let doc = load_document(self.store).await?;
        if doc.link_for(&platform).is_none() {
            return Err(LinkError::PlatformNotFound(platform));
        }
        self.store
            .update(&[(link_field(&platform), FieldValue::Delete)])
            .await?;
        Ok(())
    }
}
