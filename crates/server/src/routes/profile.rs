use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use sqlx::SqlitePool;

use crate::db::users::{self, Profile};
use crate::error::AppError;
use crate::session::{CurrentSession, SessionContext};

/// Age and language are free text and stored as given.
#[derive(Deserialize)]
pub struct ProfileRequest {
    pub username: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub language: String,
}

/// POST /api/profiles
pub async fn create_profile(
    Extension(pool): Extension<SqlitePool>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let profile = users::create_profile(&pool, &req.username, &req.age, &req.language).await?;
    tracing::info!("Created profile {}", profile.username);
    Ok(Json(profile))
}

/// GET /api/profiles/{username}
pub async fn get_profile(
    Extension(pool): Extension<SqlitePool>,
    Path(username): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile = users::get_profile(&pool, &username)
        .await?
        .ok_or(AppError::NotFound("Username does not exist.".into()))?;
    Ok(Json(profile))
}

/// Only the profile the session is logged in as may be changed.
fn require_own_profile(ctx: &SessionContext, username: &str) -> Result<(), AppError> {
    let user = ctx.require_user()?;
    if user == username {
        Ok(())
    } else {
        Err(AppError::Unauthorized(format!("Not logged in as {username}")))
    }
}

/// PUT /api/profiles/{username}
///
/// The body's `username` becomes the new name and the session follows it.
pub async fn update_profile(
    Extension(pool): Extension<SqlitePool>,
    session: CurrentSession,
    Path(old_username): Path<String>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let mut ctx = session.context.lock().await;
    require_own_profile(&ctx, &old_username)?;

    let profile =
        match users::update_profile(&pool, &old_username, &req.username, &req.age, &req.language)
            .await
        {
            Err(AppError::NotFound(msg)) => {
                // Removed by another session since this one logged in.
                ctx.logout();
                return Err(AppError::NotFound(msg));
            }
            other => other?,
        };

    ctx.current_user = Some(profile.username.clone());

    tracing::info!("Updated profile {old_username} -> {}", profile.username);
    Ok(Json(profile))
}

/// DELETE /api/profiles/{username}
pub async fn delete_profile(
    Extension(pool): Extension<SqlitePool>,
    session: CurrentSession,
    Path(username): Path<String>,
) -> Result<Json<JsonValue>, AppError> {
    let mut ctx = session.context.lock().await;
    require_own_profile(&ctx, &username)?;

    let deleted = users::delete_profile(&pool, &username).await;
    if matches!(deleted, Ok(()) | Err(AppError::NotFound(_))) {
        ctx.logout();
    }
    deleted?;

    tracing::info!("Deleted profile {username} and its game history");
    Ok(Json(json!({ "deleted": username })))
}
