//! Validation server binary.

use olympia_validation::audit::PostgresAuditLog;
use olympia_validation::{
    HttpIdentityDirectory, HttpTicketingDirectory, MemoryAuditLog, ValidationConfig, Validator,
    build_router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,olympia_validation=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ValidationConfig::from_env();

    let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
    let tickets = HttpTicketingDirectory::new(http.clone(), config.tickets_service_url.clone());
    let identities = HttpIdentityDirectory::new(http, config.auth_service_url.clone());

    let app = match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await?;
            let audit = PostgresAuditLog::new(pool);
            audit.migrate().await?;
            tracing::info!("Using PostgreSQL audit log");
            build_router(Validator {
                tickets,
                identities,
                audit,
            })
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory audit log");
            build_router(Validator {
                tickets,
                identities,
                audit: MemoryAuditLog::new(),
            })
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Validation service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
