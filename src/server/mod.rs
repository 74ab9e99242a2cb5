pub mod api;

use crate::services::PriceResolver;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PriceResolver>,
}

pub fn router(resolver: Arc<PriceResolver>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/crops/{market}", get(api::crops_handler))
        .route("/api/history/{market}/{crop}", get(api::history_handler))
        .route("/api/prices", get(api::prices_handler))
        .route("/api/prices/live", get(api::live_prices_handler))
        .route("/api/prices/anchor", get(api::anchor_handler))
        .route("/health", get(api::health_handler))
        .layer(cors)
        .with_state(AppState { resolver })
}

/// Start the axum server
pub async fn serve(
    resolver: Arc<PriceResolver>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting mandiprice server");
    tracing::info!("Registering routes:");
    tracing::info!("  GET /api/crops/{{market}}");
    tracing::info!("  GET /api/history/{{market}}/{{crop}}?limit=30");
    tracing::info!("  GET /api/prices?market=gangavati&crop=rice");
    tracing::info!("  GET /api/prices/live");
    tracing::info!("  GET /api/prices/anchor?market=davangere&crop=Rice");
    tracing::info!("  GET /health");

    let app = router(resolver);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
