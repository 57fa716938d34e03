use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use translation_studio::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real deployments set the environment directly
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("translation_studio=debug,tower_http=debug")),
        )
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = Config::discover();
    let config = Config::load(config_path.as_deref())?;
    match &config_path {
        Some(path) => info!("Loaded configuration from: {}", path.display()),
        None => info!("No configuration file found, using defaults and environment"),
    }

    let addr = config.server.socket_addr()?;

    // Backend validation happens here, before the first request
    let app_state = AppState::new(config);
    app_state.spawn_session_sweeper();
    let app = create_app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
