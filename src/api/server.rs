use std::net::SocketAddr;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{services, state::AppState, webhook};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/rfq", post(services::submit_rfq))
        .route("/api/catalog-rfq", post(services::submit_catalog_rfq))
        .route("/api/contact", post(services::submit_contact))
        .route("/api/catalog-download", post(services::submit_catalog_download))
        .route("/api/resources/{id}", get(services::download_resource))
        .route("/api/revalidate", post(webhook::revalidate).get(webhook::describe))
        .route("/api/events", post(services::record_event))
        .route("/health", get(services::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(address: SocketAddr, state: AppState) -> Result<(), AnyError> {
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "Lead API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
