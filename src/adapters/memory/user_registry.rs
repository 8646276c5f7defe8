use crate::domain::user::User;
use crate::ports::user_registry::{Result, UserRegistry as UserRegistryTrait};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of UserRegistry
pub struct UserRegistry {
    users: Mutex<Vec<User>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRegistryTrait for UserRegistry {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(lock(&self.users)?.iter().find(|u| u.name == name).cloned())
    }

    async fn save(&self, user: User) -> Result<()> {
        let mut users = lock(&self.users)?;
        match users.iter_mut().find(|u| u.name == user.name) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>> {
        Ok(lock(&self.users)?.clone())
    }
}
