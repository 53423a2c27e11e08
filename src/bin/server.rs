//! Backend server: mounts the chat API, the admin resource browser, and the
//! common operational routes.

use axum::Router;
use confide_backend::{
    admin_routes, chat_routes, common_routes_with_ready, AppState, Config, ResourceCatalog,
};
use mongodb::Client;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("confide_backend=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    // The client connects lazily; a down store surfaces on first use and on
    // the readiness probe, not here.
    let client = Client::with_uri_str(&config.mongodb_url).await?;
    let state = AppState::new(
        client.database(&config.db_name),
        ResourceCatalog::new(config.allowed_collections.clone()),
    );

    let app = Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api", chat_routes(state.clone()))
        .nest("/api/admin", admin_routes(state))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
