pub mod book_catalog;
pub mod event_log;
pub mod loan_desk;
pub mod membership_registry;
pub mod session_store;
pub mod user_registry;

pub use book_catalog::BookCatalog;
pub use event_log::EventLog;
pub use loan_desk::LoanDeskStore;
pub use membership_registry::MembershipRegistry;
pub use session_store::SessionStore;
pub use user_registry::UserRegistry;

use std::sync::{Mutex, MutexGuard};

type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Lock a store, turning a poisoned mutex into a port error.
fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::from("in-memory store lock poisoned"))
}
