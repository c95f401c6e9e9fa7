use crate::application::dto::links::PlatformLinkDto;
use crate::application::ports::link_document_store::LinkDocumentStore;
use crate::application::use_cases::links::{LinkError, load_document};
use crate::domain::links::link_document::normalize_platform;

pub struct GetLink<'a, S: LinkDocumentStore + ?Sized> {
    pub store: &'a S,
}

impl<'a, S: LinkDocumentStore + ?Sized> GetLink<'a, S> {
    pub async fn execute(&self, platform: &str) -> Result<PlatformLinkDto, LinkError> {
        let platform = normalize_platform(platform);
        let doc = load_document(self.store).await?;
        let Some(link) = doc.link_for(&platform).cloned() else {
            return Err(LinkError::PlatformNotFound(platform));
        };
        Ok(PlatformLinkDto { platform, link })
    }
}
