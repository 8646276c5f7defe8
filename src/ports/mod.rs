pub mod book_catalog;
pub mod event_log;
pub mod loan_desk;
pub mod membership_registry;
pub mod session_store;
pub mod user_registry;

pub use book_catalog::BookCatalog;
pub use event_log::{EventLog, EventRecord};
pub use loan_desk::LoanDeskStore;
pub use membership_registry::MembershipRegistry;
pub use session_store::SessionStore;
pub use user_registry::UserRegistry;
