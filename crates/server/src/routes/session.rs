use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::users;
use crate::error::AppError;
use crate::session::{CurrentSession, SessionStore, SessionView};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
}

/// POST /api/sessions
pub async fn create_session(
    Extension(store): Extension<SessionStore>,
) -> Json<CreateSessionResponse> {
    let session_id = store.create().await;
    tracing::debug!("Session {session_id} started");
    Json(CreateSessionResponse { session_id })
}

/// GET /api/session
pub async fn get_session(session: CurrentSession) -> Json<SessionView> {
    Json(session.context.lock().await.view())
}

/// DELETE /api/sessions
pub async fn end_session(
    Extension(store): Extension<SessionStore>,
    session: CurrentSession,
) -> Json<JsonValue> {
    let ended = store.remove(&session.id).await;
    tracing::debug!("Session {} ended", session.id);
    Json(json!({ "ended": ended }))
}

/// POST /api/session/login
///
/// Identification only: the username must exist, nothing else is checked.
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    session: CurrentSession,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut ctx = session.context.lock().await;

    users::get_profile(&pool, &req.username)
        .await?
        .ok_or(AppError::NotFound("Username does not exist.".into()))?;

    ctx.login(&req.username);
    tracing::info!("Logged in as {}", req.username);
    Ok(Json(ctx.view()))
}

/// POST /api/session/logout
pub async fn logout(session: CurrentSession) -> Json<SessionView> {
    let mut ctx = session.context.lock().await;
    if let Some(user) = ctx.current_user.as_deref() {
        tracing::info!("Logged out {user}");
    }
    ctx.logout();
    Json(ctx.view())
}
