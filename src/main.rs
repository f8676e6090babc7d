use anyhow::Result;
use tracing::info;

use essenza_site::{build_router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("essenza_site=info".parse()?),
        )
        .init();

    info!("Starting Essenza site backend");

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = config.port;

    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
