//! Server-side state that outlives a single request.

pub mod session;
pub mod views;

pub use session::{MemorySessionStore, Session, SessionStore};
pub use views::{MemoryViewCounts, SqliteViewCounts, ViewCountStore};
