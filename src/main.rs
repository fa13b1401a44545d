use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bookstopper_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, PgBookStore},
    services::Taxonomy,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let taxonomy = Taxonomy::load(config.taxonomy_path.as_deref())?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    tracing::info!(max_connections = config.db_max_connections, "Database pool ready");

    let state = AppState::new(Arc::new(PgBookStore::new(pool)), taxonomy).with_settings(
        config.preference_settings(),
        config.recommendation_settings(),
    );
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
