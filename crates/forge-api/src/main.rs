//! Binary entrypoint for the Forge API server.
use forge_api::{run, ApiConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("forge_api=debug,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let profile = config.load_profile()?;
    tracing::info!(profile = %profile.name, "validation profile loaded");

    let state = AppState::new(config, profile)?;
    run(state).await?;
    Ok(())
}
