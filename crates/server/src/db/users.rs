use sqlx::SqlitePool;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, serde::Serialize)]
pub struct Profile {
    pub username: String,
    pub age: String,
    pub language: String,
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Map a unique-key collision to a conflict carrying `message`; anything
/// else stays a database error.
fn conflict_or_sqlx(err: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Sqlx(err)
    }
}

pub async fn create_profile(
    pool: &SqlitePool,
    username: &str,
    age: &str,
    language: &str,
) -> Result<Profile, AppError> {
    sqlx::query("INSERT INTO users (username, age, language) VALUES (?, ?, ?)")
        .bind(username)
        .bind(age)
        .bind(language)
        .execute(pool)
        .await
        .map_err(|e| conflict_or_sqlx(e, "Username already exists."))?;

    Ok(Profile {
        username: username.to_string(),
        age: age.to_string(),
        language: language.to_string(),
    })
}

pub async fn get_profile(pool: &SqlitePool, username: &str) -> Result<Option<Profile>, AppError> {
    sqlx::query_as::<_, Profile>("SELECT username, age, language FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)
}

/// Update a profile, possibly renaming it, and move its games to the new
/// name. Both statements commit together or not at all.
pub async fn update_profile(
    pool: &SqlitePool,
    old_username: &str,
    new_username: &str,
    age: &str,
    language: &str,
) -> Result<Profile, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    let updated = sqlx::query(
        "UPDATE users SET username = ?, age = ?, language = ? WHERE username = ?",
    )
    .bind(new_username)
    .bind(age)
    .bind(language)
    .bind(old_username)
    .execute(&mut *tx)
    .await
    .map_err(|e| conflict_or_sqlx(e, "New username already exists."))?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("Username does not exist.".into()));
    }

    sqlx::query("UPDATE games SET username = ? WHERE username = ?")
        .bind(new_username)
        .bind(old_username)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    tx.commit().await.map_err(AppError::Sqlx)?;

    Ok(Profile {
        username: new_username.to_string(),
        age: age.to_string(),
        language: language.to_string(),
    })
}

/// Delete a profile together with its game history.
pub async fn delete_profile(pool: &SqlitePool, username: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    sqlx::query("DELETE FROM games WHERE username = ?")
        .bind(username)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    let deleted = sqlx::query("DELETE FROM users WHERE username = ?")
        .bind(username)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Username does not exist.".into()));
    }

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{games, test_pool};

    #[tokio::test]
    async fn test_create_and_get_profile() {
        let pool = test_pool().await;
        create_profile(&pool, "alice", "30", "en").await.unwrap();

        let profile = get_profile(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(profile.age, "30");
        assert_eq!(profile.language, "en");
        assert!(get_profile(&pool, "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict_and_keeps_row() {
        let pool = test_pool().await;
        create_profile(&pool, "alice", "30", "en").await.unwrap();

        let err = create_profile(&pool, "alice", "99", "fr").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Username already exists."));

        let profile = get_profile(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(profile.age, "30");
        assert_eq!(profile.language, "en");
    }

    #[tokio::test]
    async fn test_rename_cascades_to_games() {
        let pool = test_pool().await;
        create_profile(&pool, "alice", "30", "en").await.unwrap();
        games::insert_game(&pool, "alice", "e2e4", "Resigned", "2025-01-01 10:00:00")
            .await
            .unwrap();

        let updated = update_profile(&pool, "alice", "alicia", "31", "de").await.unwrap();
        assert_eq!(updated.username, "alicia");

        assert!(get_profile(&pool, "alice").await.unwrap().is_none());
        assert!(games::list_games(&pool, "alice").await.unwrap().is_empty());

        let moved = games::list_games(&pool, "alicia").await.unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].username, "alicia");
    }

    #[tokio::test]
    async fn test_rename_onto_existing_user_rolls_back() {
        let pool = test_pool().await;
        create_profile(&pool, "alice", "30", "en").await.unwrap();
        create_profile(&pool, "bob", "40", "fr").await.unwrap();
        games::insert_game(&pool, "alice", "e2e4", "Resigned", "2025-01-01 10:00:00")
            .await
            .unwrap();

        let err = update_profile(&pool, "alice", "bob", "1", "xx").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "New username already exists."));

        assert_eq!(get_profile(&pool, "alice").await.unwrap().unwrap().age, "30");
        assert_eq!(get_profile(&pool, "bob").await.unwrap().unwrap().age, "40");
        assert_eq!(games::list_games(&pool, "alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_in_place_and_missing_user() {
        let pool = test_pool().await;
        create_profile(&pool, "alice", "30", "en").await.unwrap();

        update_profile(&pool, "alice", "alice", "31", "en").await.unwrap();
        assert_eq!(get_profile(&pool, "alice").await.unwrap().unwrap().age, "31");

        let err = update_profile(&pool, "ghost", "spirit", "1", "en").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_profile_and_games() {
        let pool = test_pool().await;
        create_profile(&pool, "alice", "30", "en").await.unwrap();
        create_profile(&pool, "bob", "40", "fr").await.unwrap();
        games::insert_game(&pool, "alice", "e2e4", "Resigned", "2025-01-01 10:00:00")
            .await
            .unwrap();
        games::insert_game(&pool, "bob", "d2d4", "Resigned", "2025-01-01 11:00:00")
            .await
            .unwrap();

        delete_profile(&pool, "alice").await.unwrap();

        assert!(get_profile(&pool, "alice").await.unwrap().is_none());
        assert!(games::list_games(&pool, "alice").await.unwrap().is_empty());
        assert_eq!(games::list_games(&pool, "bob").await.unwrap().len(), 1);

        let err = delete_profile(&pool, "alice").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
