pub mod activity_service;
pub mod admin_service;
pub mod catalog_service;
mod dependencies;
mod errors;
pub mod loan_service;
pub mod membership_service;
pub mod session_service;

pub use dependencies::ServiceDependencies;
pub use errors::{LibraryApplicationError, Result};

use crate::domain::DomainEvent;

/// 操作履歴にイベントを追記する
async fn record(deps: &ServiceDependencies, event: DomainEvent) -> Result<()> {
    deps.event_log
        .append(vec![event])
        .await
        .map_err(LibraryApplicationError::EventLogError)
}
