pub mod middleware;
pub mod store;

pub use middleware::CurrentSession;
pub use store::{SessionContext, SessionStore, SessionView};
