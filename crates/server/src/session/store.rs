//! Per-session state held in process memory.
//!
//! Each browser session owns one [`SessionContext`]. Requests for the same
//! session queue on its mutex; different sessions never block each other
//! beyond the brief registry lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chess_core::board_view::{ascii_board, placement_fen, side_to_move};
use chess_core::{GameSession, PositionStatus};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Default)]
pub struct SessionContext {
    pub current_user: Option<String>,
    pub game: GameSession,
}

impl SessionContext {
    /// Identify the session as `username`. Switching to a different user
    /// ends any game in progress.
    pub fn login(&mut self, username: &str) {
        if self.current_user.as_deref() != Some(username) {
            self.game.end();
        }
        self.current_user = Some(username.to_string());
    }

    /// Forget the user; an unsaved game is dropped silently.
    pub fn logout(&mut self) {
        self.current_user = None;
        self.game.end();
    }

    pub fn require_user(&self) -> Result<String, AppError> {
        self.current_user
            .clone()
            .ok_or_else(|| AppError::Unauthorized("Not logged in".into()))
    }

    pub fn view(&self) -> SessionView {
        let board = self.game.board();
        SessionView {
            current_user: self.current_user.clone(),
            game_active: self.game.is_active(),
            history: self.game.history().to_vec(),
            board: placement_fen(board),
            board_ascii: ascii_board(board),
            turn: side_to_move(board),
            status: self.game.status(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub current_user: Option<String>,
    pub game_active: bool,
    pub history: Vec<String>,
    pub board: String,
    pub board_ascii: String,
    pub turn: &'static str,
    pub status: PositionStatus,
}

/// Sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct SessionEntry {
    context: Arc<Mutex<SessionContext>>,
    last_access: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Start a new session with no user and no game. Idle sessions are
    /// swept first.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) < self.ttl);
        sessions.insert(
            id,
            SessionEntry {
                context: Arc::new(Mutex::new(SessionContext::default())),
                last_access: now,
            },
        );
        id
    }

    /// Look up a live session and mark it as used. An expired one is removed
    /// and reported as missing.
    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<SessionContext>>> {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();

        let expired = now.duration_since(sessions.get(id)?.last_access) >= self.ttl;
        if expired {
            sessions.remove(id);
            return None;
        }

        let entry = sessions.get_mut(id)?;
        entry.last_access = now;
        Some(entry.context.clone())
    }

    /// End a session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drop every session idle past the TTL. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let now = Instant::now();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) < self.ttl);
        before - sessions.len()
    }
}
