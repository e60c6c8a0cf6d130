//! Gateway server binary.

use olympia_gateway::{build_router, AdmissionControl, GatewayConfig, GatewayState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,olympia_gateway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();
    tracing::info!(
        auth = %config.auth_service_url,
        tickets = %config.tickets_service_url,
        validation = %config.validation_service_url,
        "Configuration loaded"
    );

    let control = Arc::new(AdmissionControl::new(
        config.auth_rate_limit,
        config.auth_window(),
        config.api_rate_limit,
        config.api_window(),
    ));

    let state = GatewayState {
        http: reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.upstream_timeout))
            .build()?,
        upstreams: config.upstreams(),
    };

    let app = build_router(state, control);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Gateway listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down gracefully...");
    })
    .await?;

    Ok(())
}
