use crate::domain::ValidationErrors;
use thiserror::Error;

/// 図書カウンターアプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LibraryApplicationError {
    /// 入力検証エラー（状態は変更されていない）
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// 管理者としてログインしていない
    #[error("Admin access required")]
    AdminRequired,

    /// 空いている会員番号を採番できなかった
    #[error("Could not allocate a free membership number")]
    MembershipNumberUnavailable,

    /// BookCatalogのエラー
    #[error("Book catalog error")]
    CatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// MembershipRegistryのエラー
    #[error("Membership registry error")]
    MembershipRegistryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// UserRegistryのエラー
    #[error("User registry error")]
    UserRegistryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// LoanDeskStoreのエラー
    #[error("Loan desk error")]
    LoanDeskError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// SessionStoreのエラー
    #[error("Session store error")]
    SessionStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// EventLogのエラー
    #[error("Event log error")]
    EventLogError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LibraryApplicationError>;
