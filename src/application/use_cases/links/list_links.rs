use crate::application::ports::link_document_store::{DocumentData, LinkDocumentStore};
use crate::application::use_cases::links::{LinkError, load_document};

pub struct ListLinks<'a, S: LinkDocumentStore + ?Sized> {
    pub store: &'a S,
}

impl<'a, S: LinkDocumentStore + ?Sized> ListLinks<'a, S> {
    /// Returns the whole document, not only the links map.
    pub async fn execute(&self) -> Result<DocumentData, LinkError> {
        let doc = load_document(self.store).await?;
        Ok(doc.into_data())
    }
}
