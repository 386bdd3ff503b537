pub mod game;
pub mod games;
pub mod health;
pub mod profile;
pub mod session;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};

use crate::session::SessionStore;

/// Build the application router with its shared state attached.
pub fn router(pool: SqlitePool, sessions: SessionStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Session lifecycle
        .route(
            "/api/sessions",
            post(session::create_session).delete(session::end_session),
        )
        .route("/api/session", get(session::get_session))
        .route("/api/session/login", post(session::login))
        .route("/api/session/logout", post(session::logout))
        // Profiles
        .route("/api/profiles", post(profile::create_profile))
        .route(
            "/api/profiles/{username}",
            get(profile::get_profile)
                .put(profile::update_profile)
                .delete(profile::delete_profile),
        )
        // Current game
        .route("/api/game/start", post(game::start_game))
        .route("/api/game/move", post(game::make_move))
        .route("/api/game/undo", post(game::undo_move))
        .route("/api/game/resign", post(game::resign))
        .route("/api/game/finish", post(game::finish))
        // Game history
        .route("/api/games", get(games::get_my_games))
        // Shared state
        .layer(Extension(pool))
        .layer(Extension(sessions))
        .layer(cors)
}
