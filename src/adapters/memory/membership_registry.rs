use crate::domain::{MembershipNumber, membership::Membership};
use crate::ports::membership_registry::{MembershipRegistry as MembershipRegistryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of MembershipRegistry
pub struct MembershipRegistry {
    memberships: Mutex<Vec<Membership>>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self {
            memberships: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MembershipRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipRegistryTrait for MembershipRegistry {
    async fn get(&self, number: &MembershipNumber) -> Result<Option<Membership>> {
        Ok(lock(&self.memberships)?
            .iter()
            .find(|m| &m.number == number)
            .cloned())
    }

    async fn contains(&self, number: &MembershipNumber) -> Result<bool> {
        Ok(lock(&self.memberships)?.iter().any(|m| &m.number == number))
    }

    async fn save(&self, membership: Membership) -> Result<()> {
        let mut memberships = lock(&self.memberships)?;
        match memberships.iter_mut().find(|m| m.number == membership.number) {
            Some(existing) => *existing = membership,
            None => memberships.push(membership),
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Membership>> {
        Ok(lock(&self.memberships)?.clone())
    }
}
