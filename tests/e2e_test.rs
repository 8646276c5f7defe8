use axum::body::Body;
use axum::http::{Request, StatusCode};
use rusty_library_desk::api::handlers::AppState;
use rusty_library_desk::api::router::create_router;
use rusty_library_desk::api::types::ErrorResponse;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

// ============================================================================
// E2Eテスト用のヘルパー関数
// ============================================================================

/// E2Eテスト用のアプリケーションセットアップ
///
/// デモ蔵書入りのインメモリ依存関係と実際のAPIルーターを使用します。
/// 「本日」は2024-01-01に固定します。
fn setup_e2e_app() -> axum::Router {
    let service_deps = common::create_test_deps();
    let app_state = Arc::new(AppState::with_clock(service_deps, Arc::new(common::today)));
    create_router(app_state)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(
            String::from_utf8_lossy(&body).into_owned(),
        ))
    };
    (status, value)
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
    )
    .await
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

// ============================================================================
// E2Eテスト: 正常系フロー
// ============================================================================

#[tokio::test]
async fn test_e2e_health_check() {
    let app = setup_e2e_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_e2e_full_loan_flow() {
    let app = setup_e2e_app();

    // Step 1: ログイン（POST /session/login）
    let (status, body) = post_json(
        &app,
        "/session/login",
        json!({ "name": "ravi", "password": "secret" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome ravi (MEMBER)");
    assert_eq!(body["role"], "member");

    // Step 2: 検索（GET /books/search）
    let (status, body) = get(&app, "/books/search?category=Database").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "found");
    assert_eq!(body["books"][0]["serial_number"], "S303");
    let book_id = body["books"][0]["id"].as_u64().unwrap();

    // Step 3: 選択（POST /loans/select）
    let (status, body) = post_json(&app, "/loans/select", json!({ "book_id": book_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book_name"], "SQL Master");
    assert_eq!(body["issue_date"], "2024-01-01");
    assert_eq!(body["return_date"], "2024-01-16");

    // Step 4: 貸出（POST /loans/issue）
    let (status, body) = post_json(
        &app,
        "/loans/issue",
        json!({
            "book_name": "SQL Master",
            "issue_date": "2024-01-01",
            "return_date": "2024-01-10",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book issued successfully.");
    assert_eq!(body["loan"]["due_date"], "2024-01-10");

    // Step 5: 現況（GET /loans/active）
    let (status, body) = get(&app, "/loans/active").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "issued");
    assert_eq!(body["active_loan"]["serial_number"], "S303");

    // Step 6: 返却（POST /loans/return）
    let (status, body) = post_json(
        &app,
        "/loans/return",
        json!({
            "book_name": "SQL Master",
            "serial_number": "S303",
            "actual_return_date": "2024-01-13",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan"]["pending_fine"], 30);
    assert_eq!(body["loan"]["late_days"], 3);

    // Step 7: 未払いの精算は拒否
    let (status, body) = post_json(&app, "/loans/settle", json!({ "paid": false })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "fine");

    // Step 8: 精算（POST /loans/settle）
    let (status, body) = post_json(
        &app,
        "/loans/settle",
        json!({ "paid": true, "remarks": "paid in cash" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Return book transaction completed successfully."
    );
    assert_eq!(body["settlement"]["amount"], 30);

    let (_, body) = get(&app, "/loans/active").await;
    assert_eq!(body["phase"], "no_active_loan");
    assert_eq!(body["active_loan"], Value::Null);
    assert_eq!(body["pending_fine"], 0);

    // 操作履歴（GET /events）
    let (status, body) = get(&app, "/events").await;
    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["event"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec![
            "UserLoggedIn",
            "BookSelected",
            "BookIssued",
            "BookReturned",
            "FineSettled"
        ]
    );
}

#[tokio::test]
async fn test_e2e_membership_lifecycle() {
    let app = setup_e2e_app();

    let (status, body) = post_json(
        &app,
        "/memberships",
        json!({
            "member_name": "Asha",
            "start_date": "2024-01-01",
            "duration": "12",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["membership"]["end_date"], "2025-01-01");
    let number = body["membership"]["number"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app,
        "/memberships/update",
        json!({ "membership_number": number, "action": "extend6" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Membership extended till 2025-07-01.");

    let (status, body) = get(&app, &format!("/memberships/{}", number)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["end_date"], "2025-07-01");
    assert_eq!(body["active"], true);

    let (status, body) = get(&app, "/memberships").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_e2e_admin_adds_book_and_user() {
    let app = setup_e2e_app();

    post_json(
        &app,
        "/session/login",
        json!({ "name": "meera", "password": "pw", "role": "admin" }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/admin/books",
        json!({
            "kind": "new",
            "name": "Rust in Action",
            "author": "Tim McNamara",
            "serial_number": "R505",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["id"], 5);
    assert_eq!(body["book"]["category"], "Programming");

    let (status, body) = get(&app, "/books/search?name=rust").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"][0]["serial_number"], "R505");

    let (status, body) = post_json(
        &app,
        "/admin/users",
        json!({ "kind": "new", "name": "ravi", "password": "secret", "role": "member" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "New user created.");
    assert_eq!(body["user"]["name"], "ravi");
    assert!(body["user"].get("password").is_none());
}

// ============================================================================
// E2Eテスト: エラーケース
// ============================================================================

#[tokio::test]
async fn test_e2e_search_without_criteria_returns_422() {
    let app = setup_e2e_app();

    let (status, body) = get(&app, "/books/search").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(error.error, "VALIDATION_FAILED");
    assert_eq!(error.fields.len(), 1);
    assert_eq!(error.fields[0].message, "Enter book name or select category");
}

#[tokio::test]
async fn test_e2e_search_with_no_match_is_not_an_error() {
    let app = setup_e2e_app();

    let (status, body) = get(&app, "/books/search?name=cobol").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_results");
    assert_eq!(body["message"], "No books found");
}

#[tokio::test]
async fn test_e2e_issue_validation_reports_every_field() {
    let app = setup_e2e_app();
    post_json(&app, "/loans/select", json!({ "book_id": 1 })).await;

    let (status, body) = post_json(
        &app,
        "/loans/issue",
        json!({
            "book_name": "",
            "issue_date": "2023-12-31",
            "return_date": "",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let error: ErrorResponse = serde_json::from_value(body).unwrap();
    let messages: Vec<&str> = error.fields.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Book name required",
            "Issue date cannot be before today",
            "Return date required"
        ]
    );
}

#[tokio::test]
async fn test_e2e_admin_routes_require_admin_session() {
    let app = setup_e2e_app();

    let (status, body) = post_json(
        &app,
        "/admin/books",
        json!({ "kind": "new", "name": "X", "author": "Y", "serial_number": "Z1" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "ADMIN_REQUIRED");

    let (status, _) = get(&app, "/admin/users").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_e2e_unknown_membership_returns_404() {
    let app = setup_e2e_app();

    let (status, body) = get(&app, "/memberships/MEM00000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Membership not found");

    let (status, body) = post_json(
        &app,
        "/memberships/update",
        json!({ "membership_number": "MEM00000", "action": "cancel" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_e2e_select_unknown_book_returns_404() {
    let app = setup_e2e_app();

    let (status, body) = post_json(&app, "/loans/select", json!({ "book_id": 42 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found.");
}

#[tokio::test]
async fn test_e2e_logout_clears_session() {
    let app = setup_e2e_app();

    post_json(&app, "/session/login", json!({ "name": "ravi", "password": "pw" })).await;
    let (_, body) = get(&app, "/session").await;
    assert_eq!(body["logged_in"], true);
    assert_eq!(body["session"]["user_name"], "ravi");

    let (status, body) = post_json(&app, "/session/logout", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged_out"], true);

    let (_, body) = get(&app, "/session").await;
    assert_eq!(body["logged_in"], false);
}
