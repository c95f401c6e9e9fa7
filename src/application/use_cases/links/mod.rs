pub mod delete_link;
pub mod get_link;
pub mod list_links;
pub mod update_link;
pub mod upsert_link;

use crate::application::ports::link_document_store::{FieldPath, LinkDocumentStore};
use crate::domain::links::link_document::{LINKS_FIELD, LinkDocument};

#[derive(thiserror::Error, Debug)]
pub enum LinkError {
    #[error("No data found")]
    NoData,
    #[error("Link for platform {0} not found")]
    PlatformNotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub(crate) fn link_field(platform: &str) -> FieldPath {
    FieldPath::new([LINKS_FIELD, platform])
}

pub(crate) async fn load_document<S>(store: &S) -> Result<LinkDocument, LinkError>
where
    S: LinkDocumentStore + ?Sized,
{
    match store.get().await? {
        Some(data) => Ok(LinkDocument::new(data)),
        None => Err(LinkError::NoData),
    }
}
