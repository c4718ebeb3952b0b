mod config;
mod db;
mod rate_limit;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::services::jwks::TokenVerifier;
use crate::services::memory_store::MemoryStore;
use crate::services::pg_store::PgStore;
use crate::services::store::InventoryStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();

    let store: Arc<dyn InventoryStore> = match &config.database_url {
        Some(url) => {
            let pool = db::init_pool(url).await.expect("database init failed");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory catalog (data is lost on restart)");
            Arc::new(MemoryStore::new())
        }
    };

    let verifier = if config.auth_bypass {
        tracing::warn!("AUTH_BYPASS enabled; bearer tokens are not verified");
        TokenVerifier::bypass(config.provider.clone())
    } else {
        tracing::info!(issuer = %config.provider.issuer(), "verifying bearer tokens against provider JWKS");
        TokenVerifier::new(config.provider.clone())
    };

    let limits = RateLimitConfig::from_env();
    tracing::info!(
        reads = limits.read_limit,
        writes = limits.write_limit,
        low_stock = limits.low_stock_limit,
        window_secs = limits.window.as_secs(),
        "rate limits configured"
    );

    let state = state::AppState::new(store, verifier, RateLimiter::new(limits));

    let app = routes::app(state, &config.cors_origins).expect("failed to build router");
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "inventory api listening");
    axum::serve(listener, app).await.expect("server failed");
}
