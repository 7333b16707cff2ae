use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ridebook::config::AppConfig;
use ridebook::db;
use ridebook::router;
use ridebook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(
        config.dev_mode || !config.token_secret.is_empty(),
        "TOKEN_SECRET must be set unless DEV_MODE=true"
    );
    if config.dev_mode {
        tracing::warn!("dev mode enabled: /api/dev/token mints tokens for any principal");
    }
    match &config.owner_principal {
        Some(owner) => tracing::info!(%owner, "deployment owner configured"),
        None => tracing::warn!("OWNER_PRINCIPAL not set; admins must be assigned directly in the database"),
    }
    tracing::info!(strategy = config.phone_lookup.as_str(), "phone lookup strategy");

    let conn = db::init_db(&config.database_url)?;
    let state = Arc::new(AppState::new(conn, config.clone()));
    let app = router::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
