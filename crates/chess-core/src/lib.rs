//! Self-play game session state, delegating every rules question to shakmaty.

pub mod board_view;
pub mod session;

pub use session::{
    Conclusion, GameSession, GameTranscript, MoveError, PositionStatus, SessionError,
};
