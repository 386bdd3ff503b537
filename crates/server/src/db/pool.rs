use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Open the SQLite pool. An in-memory database lives only as long as its
/// connection, so it gets exactly one that is never recycled.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Create the schema if it is not there yet. There is no versioning.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Player profiles
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    age      TEXT,
    language TEXT
);

-- Finished games; username is not enforced as a foreign key
CREATE TABLE IF NOT EXISTS games (
    username  TEXT,
    moves     TEXT,
    result    TEXT,
    timestamp TEXT
);
"#;
