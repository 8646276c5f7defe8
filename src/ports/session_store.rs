use crate::domain::user::Session;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Session store port.
///
/// Holds the single logged-in user of the desk.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session, if someone is logged in.
    async fn current(&self) -> Result<Option<Session>>;

    /// Replace the current session.
    async fn set(&self, session: Session) -> Result<()>;

    /// Log out.
    async fn clear(&self) -> Result<()>;
}
