use anyhow::{Context, Result};
use ariana_api::{build_app, ApiConfig};
use ariana_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("ariana_api");

    let config = ApiConfig::from_env()?;
    let app = build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(bind = %config.bind, model = %config.gemini.model, "ariana labs assistant started");

    axum::serve(listener, app).await?;
    Ok(())
}
