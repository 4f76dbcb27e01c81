use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vistoria_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, sheets, notifier, routes)
    let (_state, router) = vistoria_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    vistoria_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
