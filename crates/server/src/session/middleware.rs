use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::AppError;
use crate::session::store::{SessionContext, SessionStore};

/// The caller's session, resolved from `Authorization: Bearer <session id>`.
/// This only identifies the browser session; it carries no credentials.
#[derive(Clone)]
pub struct CurrentSession {
    pub id: Uuid,
    pub context: Arc<Mutex<SessionContext>>,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let store = parts
            .extensions
            .get::<SessionStore>()
            .ok_or(AppError::Internal("Missing session store".into()))?
            .clone();

        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(unknown_session)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(unknown_session)?;

        let id = Uuid::parse_str(token.trim()).map_err(|_| unknown_session())?;
        let context = store.get(&id).await.ok_or_else(unknown_session)?;

        Ok(CurrentSession { id, context })
    }
}

fn unknown_session() -> AppError {
    AppError::Unauthorized("Unknown session".into())
}
