use server::config;
use server::db;
use server::routes;
use server::session::SessionStore;

use std::time::Duration;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    tracing::info!("Opening database {}", config.database_url);
    let pool = db::pool::create_pool(&config.database_url, config.database_max_connections).await?;

    tracing::info!("Ensuring schema...");
    db::pool::run_migrations(&pool).await?;

    let sessions = SessionStore::with_ttl(Duration::from_secs(config.session_ttl_minutes * 60));

    // Sweep sessions whose tab went away without ending them
    tokio::spawn({
        let sessions = sessions.clone();
        async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                match sessions.evict_idle().await {
                    0 => {}
                    n => tracing::info!("Evicted {n} idle sessions"),
                }
            }
        }
    });

    let app = routes::router(pool, sessions);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
