use std::sync::Arc;

use moviedb::{AppState, config::Config, create_app, db, repository::MovieRepository, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviedb=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let db = db::connect_and_migrate(&config.database_url, config.database_max_connections).await?;
    let movies = MovieRepository::new(db);

    if config.seed_on_startup {
        seed::seed_if_empty(&movies, seed::catalogue()).await?;
    }

    let state = Arc::new(AppState { movies });
    let app = create_app(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
