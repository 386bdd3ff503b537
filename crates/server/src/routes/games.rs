use axum::{Extension, Json};
use serde_json::{json, Value as JsonValue};
use sqlx::SqlitePool;

use crate::db::games;
use crate::error::AppError;
use crate::session::CurrentSession;

/// GET /api/games
///
/// Every saved game of the logged-in user, oldest first.
pub async fn get_my_games(
    Extension(pool): Extension<SqlitePool>,
    session: CurrentSession,
) -> Result<Json<JsonValue>, AppError> {
    let user = session.context.lock().await.require_user()?;
    let games_list = games::list_games(&pool, &user).await?;

    Ok(Json(json!({
        "username": user,
        "games": games_list,
        "total": games_list.len(),
    })))
}
