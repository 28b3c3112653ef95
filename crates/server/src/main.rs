use std::sync::Arc;

use api::{AppState, router};
use auth::{AuthService, InMemoryDirectory};
use aulakit_core::AppConfig;
use storage::{BlobStore, CatalogService, InMemoryCatalog};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // The signing secret is mandatory: refuse to start rather than run
    // with tokens nobody can trust.
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "configuration error, refusing to start");
            std::process::exit(1);
        }
    };

    let blobs = match BlobStore::new(&config.storage.upload_dir).await {
        Ok(blobs) => blobs,
        Err(e) => {
            tracing::error!(error = %e, "failed to open upload directory");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(
        AuthService::new(Arc::new(InMemoryDirectory::new()), config.auth.jwt_secret),
        CatalogService::new(Arc::new(InMemoryCatalog::new()), blobs),
    ));

    let app = router::router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "server listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
