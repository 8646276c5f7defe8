use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, create_membership, current_session, desk_status, get_membership,
    issue_book, list_books, list_events, list_memberships, list_users, login, logout,
    return_book, save_user, search_books, select_book, settle_fine, update_book,
    update_membership,
};

/// Creates the API router for the library desk
///
/// Session:
/// - POST /session/login, POST /session/logout, GET /session
///
/// Catalog and loan desk:
/// - GET /books, GET /books/search?name=&category=
/// - POST /loans/select, /loans/issue, /loans/return, /loans/settle
/// - GET /loans/active
///
/// Memberships:
/// - GET/POST /memberships, POST /memberships/update, GET /memberships/:number
///
/// Admin (requires an admin session):
/// - POST /admin/books, POST /admin/books/update
/// - GET/POST /admin/users
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/session", get(current_session))
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
        .route("/books", get(list_books))
        .route("/books/search", get(search_books))
        .route("/loans/select", post(select_book))
        .route("/loans/issue", post(issue_book))
        .route("/loans/return", post(return_book))
        .route("/loans/settle", post(settle_fine))
        .route("/loans/active", get(desk_status))
        .route("/memberships", get(list_memberships).post(create_membership))
        .route("/memberships/update", post(update_membership))
        .route("/memberships/:number", get(get_membership))
        .route("/admin/books", post(add_book))
        .route("/admin/books/update", post(update_book))
        .route("/admin/users", get(list_users).post(save_user))
        .route("/events", get(list_events))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
