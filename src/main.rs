use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use alumni_api::config::CONFIG;
use alumni_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alumni_api=info,tower_http=info".into()),
        )
        .init();

    // Loading the singleton panics on a bad environment, which is the right
    // failure mode at startup.
    let config = Arc::new(CONFIG.clone());

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let port = config.server.port;
    let state = AppState::with_postgres(config, pool);
    let app = alumni_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("alumni API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
