//! Identity server binary.

use olympia_identity::store::PostgresIdentityStore;
use olympia_identity::{IdentityConfig, MemoryIdentityStore, build_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,olympia_identity=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = IdentityConfig::from_env();

    let app = match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await?;
            let store = PostgresIdentityStore::new(pool);
            store.migrate().await?;
            tracing::info!("Using PostgreSQL store");
            build_router(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            build_router(MemoryIdentityStore::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Identity service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
