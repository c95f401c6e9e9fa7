use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::info;

use link_registry::application::ports::link_document_store::LinkDocumentStore;
use link_registry::bootstrap::app_context::{AppContext, AppServices};
use link_registry::bootstrap::config::{Config, StoreBackend};
use link_registry::infrastructure::firestore::FirestoreLinkStore;
use link_registry::infrastructure::memory::link_store::InMemoryLinkStore;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            link_registry::presentation::http::links::list_links,
            link_registry::presentation::http::links::get_link,
            link_registry::presentation::http::links::upsert_link,
            link_registry::presentation::http::links::update_link,
            link_registry::presentation::http::links::delete_link,
            link_registry::presentation::http::health::health,
        ),
        components(schemas(
            link_registry::presentation::http::links::LinkDocumentBody,
            link_registry::presentation::http::links::LinkRequest,
            link_registry::presentation::http::links::PlatformLink,
            link_registry::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Links", description = "Social media links"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "link_registry=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting link registry");

    let link_store: Arc<dyn LinkDocumentStore> = match cfg.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreLinkStore::from_config(&cfg)?),
        StoreBackend::Memory => {
            tracing::warn!("memory_store_enabled_data_is_not_persisted");
            Arc::new(InMemoryLinkStore::new(
                &cfg.links_collection,
                &cfg.links_document,
            ))
        }
    };

    let ctx = AppContext::new(cfg.clone(), AppServices::new(link_store));

    let app = link_registry::presentation::http::router(ctx)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()));

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server running at http://localhost:{}", cfg.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown_signal_received");
}
