pub mod games;
pub mod pool;
pub mod users;

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = pool::create_pool("sqlite::memory:", 1).await.unwrap();
    pool::run_migrations(&pool).await.unwrap();
    pool
}
