use std::env;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "http://localhost:3000",
    "https://bizcard-socials-abyadav.netlify.app",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub credentials_path: Option<String>,
    pub firestore_project_id: Option<String>,
    pub firestore_database: String,
    pub firestore_emulator_host: Option<String>,
    pub links_collection: String,
    pub links_document: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);
        let store_backend = match var("STORE_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("firestore") => StoreBackend::Firestore,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                anyhow::bail!("unknown STORE_BACKEND '{other}' (expected firestore or memory)")
            }
        };
        let credentials_path =
            var("GOOGLE_APPLICATION_CREDENTIALS").filter(|s| !s.trim().is_empty());
        let firestore_project_id = var("FIRESTORE_PROJECT_ID").filter(|s| !s.trim().is_empty());
        let firestore_database = var("FIRESTORE_DATABASE").unwrap_or_else(|| "(default)".into());
        let firestore_emulator_host =
            var("FIRESTORE_EMULATOR_HOST").filter(|s| !s.trim().is_empty());
        let links_collection = var("LINKS_COLLECTION").unwrap_or_else(|| "userdata".into());
        let links_document = var("LINKS_DOCUMENT").unwrap_or_else(|| "userlinks".into());
        let allowed_origins = match var("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        // The emulator needs no service account.
        if store_backend == StoreBackend::Firestore
            && credentials_path.is_none()
            && firestore_emulator_host.is_none()
        {
            anyhow::bail!("GOOGLE_APPLICATION_CREDENTIALS environment variable is not set");
        }

        Ok(Self {
            port,
            store_backend,
            credentials_path,
            firestore_project_id,
            firestore_database,
            firestore_emulator_host,
            links_collection,
            links_document,
            allowed_origins,
        })
    }
}
