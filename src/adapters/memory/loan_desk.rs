use crate::domain::loan::LoanDesk;
use crate::ports::loan_desk::{LoanDeskStore as LoanDeskStoreTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of LoanDeskStore
///
/// Starts with nothing selected and an empty loan slot.
#[derive(Default)]
pub struct LoanDeskStore {
    desk: Mutex<LoanDesk>,
}

impl LoanDeskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanDeskStoreTrait for LoanDeskStore {
    async fn load(&self) -> Result<LoanDesk> {
        Ok(lock(&self.desk)?.clone())
    }

    async fn save(&self, desk: LoanDesk) -> Result<()> {
        *lock(&self.desk)? = desk;
        Ok(())
    }
}
