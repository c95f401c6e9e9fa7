use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use crate::application::ports::link_document_store::{
    DocumentData, FieldPath, FieldValue, LinkDocumentStore,
};
use crate::bootstrap::config::Config;
use crate::infrastructure::firestore::credentials::ServiceAccountKey;
use crate::infrastructure::firestore::token::TokenProvider;
use crate::infrastructure::firestore::value::{decode_fields, encode_fields};

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

enum FirestoreAuth {
    ServiceAccount(TokenProvider),
    /// The local emulator accepts this fixed token.
    Emulator,
}

/// One Firestore document accessed through the REST v1 API.
pub struct FirestoreLinkStore {
    client: reqwest::Client,
    auth: FirestoreAuth,
    /// `projects/{p}/databases/{db}/documents/{collection}/{document}`
    document_name: String,
    document_url: String,
}

#[derive(Debug, Deserialize)]
struct RestDocument {
    #[serde(default)]
    fields: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl FirestoreLinkStore {
    /// Reads the credentials bundle once and builds the shared client.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::new();
        let key = match cfg.credentials_path.as_deref() {
            Some(path) => Some(ServiceAccountKey::load(path)?),
            None => None,
        };
        let project_id = cfg
            .firestore_project_id
            .clone()
            .or_else(|| key.as_ref().map(|k| k.project_id.clone()))
            .ok_or_else(|| anyhow::anyhow!("no Firestore project id configured"))?;

        let (base_url, auth) = match (&cfg.firestore_emulator_host, key) {
            (Some(host), _) => {
                tracing::info!(%host, "firestore_emulator_enabled");
                (format!("http://{host}"), FirestoreAuth::Emulator)
            }
            (None, Some(key)) => (
                FIRESTORE_BASE_URL.to_string(),
                FirestoreAuth::ServiceAccount(TokenProvider::new(client.clone(), key)?),
            ),
            (None, None) => {
                anyhow::bail!("GOOGLE_APPLICATION_CREDENTIALS environment variable is not set")
            }
        };

        let document_url = document_url(
            &base_url,
            &project_id,
            &cfg.firestore_database,
            &cfg.links_collection,
            &cfg.links_document,
        );
        let document_name = format!(
            "projects/{project_id}/databases/{}/documents/{}/{}",
            cfg.firestore_database, cfg.links_collection, cfg.links_document
        );
        tracing::info!(%document_url, "firestore_link_store_ready");
        Ok(Self {
            client,
            auth,
            document_name,
            document_url,
        })
    }

    async fn bearer(&self) -> anyhow::Result<String> {
        match &self.auth {
            FirestoreAuth::ServiceAccount(tokens) => tokens.access_token().await,
            FirestoreAuth::Emulator => Ok("owner".to_string()),
        }
    }

    async fn patch(&self, query: &[(&str, String)], fields: JsonValue) -> anyhow::Result<()> {
        let token = self.bearer().await?;
        let resp = self
            .client
            .patch(&self.document_url)
            .bearer_auth(token)
            .query(query)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("firestore request failed: {e}"))?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }
}

#[async_trait]
impl LinkDocumentStore for FirestoreLinkStore {
    async fn get(&self) -> anyhow::Result<Option<DocumentData>> {
        let token = self.bearer().await?;
        let resp = self
            .client
            .get(&self.document_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("firestore request failed: {e}"))?;
        // A 404 for a missing database or project is a failure, not absence.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            if names_missing_document(&body, &self.document_name) {
                return Ok(None);
            }
            return Err(error_message(reqwest::StatusCode::NOT_FOUND, &body));
        }
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let doc: RestDocument = resp
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to read firestore document: {e}"))?;
        Ok(Some(decode_fields(doc.fields.as_ref())?))
    }

    async fn set(&self, data: &DocumentData) -> anyhow::Result<()> {
        // No update mask: the write replaces the whole document.
        self.patch(&[], encode_fields(data)).await
    }

    async fn update(&self, fields: &[(FieldPath, FieldValue)]) -> anyhow::Result<()> {
        let (query, body) = update_request(fields);
        self.patch(&query, encode_fields(&body)).await
    }
}

fn document_url(
    base_url: &str,
    project_id: &str,
    database: &str,
    collection: &str,
    document: &str,
) -> String {
    format!(
        "{}/v1/projects/{}/databases/{}/documents/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(project_id),
        urlencoding::encode(database),
        urlencoding::encode(collection),
        urlencoding::encode(document),
    )
}

/// Builds the query (precondition + update mask) and the body of a field
/// update. Deleted paths are masked but left out of the body.
fn update_request(
    fields: &[(FieldPath, FieldValue)],
) -> (Vec<(&'static str, String)>, DocumentData) {
    let mut query = vec![("currentDocument.exists", "true".to_string())];
    let mut body = DocumentData::new();
    for (path, value) in fields {
        query.push(("updateMask.fieldPaths", mask_path(path)));
        if let FieldValue::Set(v) = value {
            path.set_in(&mut body, v.clone());
        }
    }
    (query, body)
}

fn mask_path(path: &FieldPath) -> String {
    path.segments()
        .iter()
        .map(|s| quote_segment(s))
        .collect::<Vec<_>>()
        .join(".")
}

// Simple identifiers go bare; anything else is backtick-quoted.
fn quote_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let simple = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if simple {
        return segment.to_string();
    }
    let mut out = String::with_capacity(segment.len() + 2);
    out.push('`');
    for c in segment.chars() {
        if c == '`' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('`');
    out
}

fn names_missing_document(body: &str, document_name: &str) -> bool {
    let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return false;
    };
    envelope
        .error
        .message
        .is_some_and(|m| m.starts_with(&format!("Document \"{document_name}\" not found")))
}

async fn error_from_response(resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    error_message(status, &body)
}

fn error_message(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error:
                ErrorBody {
                    status: Some(code),
                    message: Some(message),
                },
        }) => anyhow::anyhow!("{code}: {message}"),
        Ok(ErrorEnvelope {
            error: ErrorBody {
                message: Some(message),
                ..
            },
        }) => anyhow::anyhow!("{message}"),
        _ => anyhow::anyhow!("firestore returned status {status}"),
    }
}
