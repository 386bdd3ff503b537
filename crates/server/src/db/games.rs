use sqlx::SqlitePool;

use crate::error::AppError;

/// Format used for the `timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct GameRecord {
    pub username: String,
    pub moves: String,
    pub result: String,
    pub timestamp: String,
}

/// Current local time in the game log's timestamp format.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Append a finished game for `username`. Nothing is written, and NotFound
/// is returned, if that profile no longer exists.
pub async fn insert_game(
    pool: &SqlitePool,
    username: &str,
    moves: &str,
    result: &str,
    timestamp: &str,
) -> Result<GameRecord, AppError> {
    let inserted = sqlx::query(
        r#"INSERT INTO games (username, moves, result, timestamp)
           SELECT ?, ?, ?, ?
           WHERE EXISTS (SELECT 1 FROM users WHERE username = ?)"#,
    )
    .bind(username)
    .bind(moves)
    .bind(result)
    .bind(timestamp)
    .bind(username)
    .execute(pool)
    .await
    .map_err(AppError::Sqlx)?;

    if inserted.rows_affected() == 0 {
        return Err(AppError::NotFound("Username does not exist.".into()));
    }

    Ok(GameRecord {
        username: username.to_string(),
        moves: moves.to_string(),
        result: result.to_string(),
        timestamp: timestamp.to_string(),
    })
}

/// All games of one user, oldest first.
pub async fn list_games(pool: &SqlitePool, username: &str) -> Result<Vec<GameRecord>, AppError> {
    sqlx::query_as::<_, GameRecord>(
        "SELECT username, moves, result, timestamp FROM games WHERE username = ? ORDER BY rowid",
    )
    .bind(username)
    .fetch_all(pool)
    .await
    .map_err(AppError::Sqlx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};

    #[tokio::test]
    async fn test_list_games_filters_by_user_in_insertion_order() {
        let pool = test_pool().await;
        users::create_profile(&pool, "alice", "30", "en").await.unwrap();
        users::create_profile(&pool, "bob", "40", "fr").await.unwrap();
        insert_game(&pool, "alice", "e2e4,e7e5", "Resigned", "2025-01-02 09:00:00")
            .await
            .unwrap();
        insert_game(&pool, "bob", "d2d4", "Resigned", "2025-01-01 09:00:00")
            .await
            .unwrap();
        insert_game(&pool, "alice", "", "Win/Loss/Draw", "2025-01-01 08:00:00")
            .await
            .unwrap();

        let games = list_games(&pool, "alice").await.unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].moves, "e2e4,e7e5");
        assert_eq!(games[1].moves, "");
        assert_eq!(games[1].result, "Win/Loss/Draw");
    }

    #[tokio::test]
    async fn test_insert_for_missing_user_writes_nothing() {
        let pool = test_pool().await;

        let err = insert_game(&pool, "ghost", "e2e4", "Resigned", "2025-01-01 10:00:00")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(list_games(&pool, "ghost").await.unwrap().is_empty());

        // A profile created later under that name starts with no history.
        users::create_profile(&pool, "ghost", "1", "en").await.unwrap();
        assert!(list_games(&pool, "ghost").await.unwrap().is_empty());
    }

    #[test]
    fn test_now_timestamp_format() {
        let ts = now_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
    }
}
