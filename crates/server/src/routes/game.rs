use axum::{Extension, Json};
use chess_core::Conclusion;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::games::{self, GameRecord};
use crate::error::AppError;
use crate::session::{CurrentSession, SessionView};

#[derive(Deserialize)]
pub struct MoveRequest {
    #[serde(rename = "move")]
    pub notation: String,
}

/// POST /api/game/start
pub async fn start_game(session: CurrentSession) -> Result<Json<SessionView>, AppError> {
    let mut ctx = session.context.lock().await;
    let user = ctx.require_user()?;

    ctx.game.start();
    tracing::info!("{user} started a new game");
    Ok(Json(ctx.view()))
}

/// POST /api/game/move
pub async fn make_move(
    session: CurrentSession,
    Json(req): Json<MoveRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut ctx = session.context.lock().await;
    ctx.require_user()?;

    ctx.game.make_move(&req.notation)?;
    Ok(Json(ctx.view()))
}

/// POST /api/game/undo
pub async fn undo_move(session: CurrentSession) -> Result<Json<SessionView>, AppError> {
    let mut ctx = session.context.lock().await;
    ctx.require_user()?;

    ctx.game.undo()?;
    Ok(Json(ctx.view()))
}

/// POST /api/game/resign
pub async fn resign(
    Extension(pool): Extension<SqlitePool>,
    session: CurrentSession,
) -> Result<Json<GameRecord>, AppError> {
    conclude_game(&pool, &session, Conclusion::Resigned).await
}

/// POST /api/game/finish
pub async fn finish(
    Extension(pool): Extension<SqlitePool>,
    session: CurrentSession,
) -> Result<Json<GameRecord>, AppError> {
    conclude_game(&pool, &session, Conclusion::Finished).await
}

/// Write the game log row, then leave the game. A failed write keeps the
/// game active, unless the profile is gone, which logs the session out.
async fn conclude_game(
    pool: &SqlitePool,
    session: &CurrentSession,
    how: Conclusion,
) -> Result<Json<GameRecord>, AppError> {
    let mut ctx = session.context.lock().await;
    let user = ctx.require_user()?;

    let transcript = ctx.game.conclude(how)?;
    let inserted = games::insert_game(
        pool,
        &user,
        &transcript.moves,
        transcript.result,
        &games::now_timestamp(),
    )
    .await;

    let record = match inserted {
        Err(AppError::NotFound(msg)) => {
            // Profile deleted or renamed by another session.
            tracing::warn!("Dropped game for missing profile {user}");
            ctx.logout();
            return Err(AppError::NotFound(msg));
        }
        other => other?,
    };

    ctx.game.end();
    tracing::info!(
        "Saved game for {user}: {} plies, result {}",
        ctx.game.history().len(),
        record.result
    );
    Ok(Json(record))
}
