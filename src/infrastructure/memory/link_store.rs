use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::link_document_store::{
    DocumentData, FieldPath, FieldValue, LinkDocumentStore,
};

/// Process-local document with the same create/update semantics as the
/// Firestore adapter. Contents are lost on restart.
pub struct InMemoryLinkStore {
    name: String,
    doc: RwLock<Option<DocumentData>>,
}

impl InMemoryLinkStore {
    pub fn new(collection: &str, document: &str) -> Self {
        Self {
            name: format!("{collection}/{document}"),
            doc: RwLock::new(None),
        }
    }

    pub fn with_data(collection: &str, document: &str, data: DocumentData) -> Self {
        Self {
            name: format!("{collection}/{document}"),
            doc: RwLock::new(Some(data)),
        }
    }
}

#[async_trait]
impl LinkDocumentStore for InMemoryLinkStore {
    async fn get(&self) -> anyhow::Result<Option<DocumentData>> {
        Ok(self.doc.read().await.clone())
    }

    async fn set(&self, data: &DocumentData) -> anyhow::Result<()> {
        *self.doc.write().await = Some(data.clone());
        Ok(())
    }

    async fn update(&self, fields: &[(FieldPath, FieldValue)]) -> anyhow::Result<()> {
        let mut guard = self.doc.write().await;
        let Some(doc) = guard.as_mut() else {
            anyhow::bail!("NOT_FOUND: No document to update: {}", self.name);
        };
        for (path, value) in fields {
            match value {
                FieldValue::Set(v) => path.set_in(doc, v.clone()),
                FieldValue::Delete => {
                    path.remove_from(doc);
                }
            }
        }
        Ok(())
    }
}
