use std::env;
use std::net::SocketAddr;

use anyhow::Result;
use travelbot_api::{build_app, AppConfig};
use travelbot_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("travelbot_api");

    let bind = env::var("TRAVELBOT_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let config = AppConfig::from_env();
    let maps = config.enrichment.maps.api_key.is_some();
    let llm = config.enrichment.openai.is_some();

    let app = build_app(config)?;

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(bind = %bind, maps, llm, "travelbot api started");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
