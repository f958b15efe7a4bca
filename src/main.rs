//! OpenSASE Sourcing - Self-hosted B2B Product Sourcing Catalog

use anyhow::Result;
use opensase_sourcing::{config::Config, http::{router, AppState}};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = Config::from_env()?;
    let state = AppState::connect(&config).await?;
    let app = router(state);

    tracing::info!("🚀 OpenSASE Sourcing listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
