use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use billetterie_server::auth::SessionStore;
use billetterie_server::config::{Config, StoreBackend};
use billetterie_server::routes::create_routes;
use billetterie_server::store::{DataStore, MemoryStore, PgStore};
use billetterie_server::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    let store: Arc<dyn DataStore> = match config.store_backend {
        StoreBackend::Postgres => Arc::new(
            PgStore::connect(&config.database_url, config.max_connections)
                .await
                .expect("Failed to connect to database"),
        ),
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory data store; nothing will be persisted");
            Arc::new(MemoryStore::new())
        }
    };

    let sessions = SessionStore::new(config.session_ttl);
    let app = create_routes(AppState::new(store, sessions), &config);

    let addr = config.socket_addr();
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
