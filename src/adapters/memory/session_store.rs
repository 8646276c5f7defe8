use crate::domain::user::Session;
use crate::ports::session_store::{Result, SessionStore as SessionStoreTrait};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of SessionStore
#[derive(Default)]
pub struct SessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStoreTrait for SessionStore {
    async fn current(&self) -> Result<Option<Session>> {
        Ok(lock(&self.session)?.clone())
    }

    async fn set(&self, session: Session) -> Result<()> {
        *lock(&self.session)? = Some(session);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *lock(&self.session)? = None;
        Ok(())
    }
}
