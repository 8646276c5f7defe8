use crate::application::LibraryApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// 「見つからない」系の情報メッセージもここで404に変換する。
#[derive(Debug)]
pub enum ApiError {
    Application(LibraryApplicationError),
    NotFound(String),
}

impl From<LibraryApplicationError> for ApiError {
    fn from(err: LibraryApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorResponse::new("NOT_FOUND", message));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            ApiError::Application(err) => err,
        };

        let (status, body) = match err {
            // 422 Unprocessable Entity - 入力検証エラー（状態は変更されていない）
            LibraryApplicationError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("VALIDATION_FAILED", errors.to_string())
                    .with_fields(errors.into_errors()),
            ),

            // 403 Forbidden - 管理者としてログインしていない
            LibraryApplicationError::AdminRequired => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("ADMIN_REQUIRED", "Admin login required"),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            LibraryApplicationError::MembershipNumberUnavailable => {
                tracing::error!("Membership number space exhausted");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "MEMBERSHIP_NUMBER_UNAVAILABLE",
                        "Could not allocate a membership number",
                    ),
                )
            }
            LibraryApplicationError::CatalogError(ref e) => {
                tracing::error!("Book catalog error: {}", e);
                internal("CATALOG_ERROR", "Book catalog error")
            }
            LibraryApplicationError::MembershipRegistryError(ref e) => {
                tracing::error!("Membership registry error: {}", e);
                internal("MEMBERSHIP_REGISTRY_ERROR", "Membership registry error")
            }
            LibraryApplicationError::UserRegistryError(ref e) => {
                tracing::error!("User registry error: {}", e);
                internal("USER_REGISTRY_ERROR", "User registry error")
            }
            LibraryApplicationError::LoanDeskError(ref e) => {
                tracing::error!("Loan desk error: {}", e);
                internal("LOAN_DESK_ERROR", "Loan desk error")
            }
            LibraryApplicationError::SessionStoreError(ref e) => {
                tracing::error!("Session store error: {}", e);
                internal("SESSION_STORE_ERROR", "Session store error")
            }
            LibraryApplicationError::EventLogError(ref e) => {
                tracing::error!("Event log error: {}", e);
                internal("EVENT_LOG_ERROR", "Failed to record event")
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal(error_type: &str, message: &str) -> (StatusCode, ErrorResponse) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorResponse::new(error_type, message),
    )
}
