use crate::application::{
    ServiceDependencies, activity_service, admin_service,
    admin_service::{BookSaved, UserSaved},
    catalog_service,
    loan_service::{self, DeskStatus, Selection},
    membership_service::{self, MembershipUpdate, MembershipView},
    session_service,
};
use crate::domain::{Book, book::SearchOutcome, loan::IssueDraft};
use crate::ports::EventRecord;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        BookResponse, CreateMembershipRequest, IssueBookRequest, IssuedResponse, LoginRequest,
        LoginResponse, LogoutResponse, MembershipResponse, ReturnBookRequest, ReturnedResponse,
        SaveBookRequest, SaveUserRequest, SearchQuery, SelectBookRequest, SessionResponse,
        SettleFineRequest, SettledResponse, UpdateMembershipRequest, UserResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// 「本日」を返す時計
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
    pub clock: Clock,
}

impl AppState {
    /// ローカル時刻の日付を「本日」とする
    pub fn new(service_deps: ServiceDependencies) -> Self {
        Self::with_clock(service_deps, Arc::new(|| chrono::Local::now().date_naive()))
    }

    pub fn with_clock(service_deps: ServiceDependencies, clock: Clock) -> Self {
        Self {
            service_deps,
            clock,
        }
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }
}

// ============================================================================
// Session
// ============================================================================

/// POST /session/login - ログイン
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let logged_in = session_service::login(&state.service_deps, req.to_command()).await?;

    Ok(Json(LoginResponse {
        user_name: logged_in.session.user_name,
        role: logged_in.session.role,
        message: logged_in.message,
    }))
}

/// POST /session/logout - ログアウト（セッションと書籍の選択をクリア）
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<LogoutResponse>, ApiError> {
    let previous = session_service::logout(&state.service_deps).await?;

    Ok(Json(LogoutResponse {
        logged_out: previous.is_some(),
    }))
}

/// GET /session - 現在のセッション
pub async fn current_session(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = session_service::current_session(&state.service_deps).await?;

    Ok(Json(SessionResponse {
        logged_in: session.is_some(),
        session,
    }))
}

// ============================================================================
// Catalog
// ============================================================================

/// GET /books - 全書籍
pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = catalog_service::list_books(&state.service_deps).await?;
    Ok(Json(books))
}

/// GET /books/search - 書名（部分一致）とカテゴリで検索
///
/// 該当なしは200で`{"status": "no_results"}`を返す。
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let outcome =
        catalog_service::search_books(&state.service_deps, &query.name, &query.category).await?;
    Ok(Json(outcome))
}

// ============================================================================
// Loans
// ============================================================================

/// POST /loans/select - 書籍を選択し、貸出フォームの初期値を返す
pub async fn select_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectBookRequest>,
) -> Result<Json<IssueDraft>, ApiError> {
    let cmd = req.to_command(state.today());

    match loan_service::select_book(&state.service_deps, cmd).await? {
        Selection::Selected(draft) => Ok(Json(draft)),
        Selection::NotFound { message } => Err(ApiError::not_found(message)),
    }
}

/// POST /loans/issue - 選択中の書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 書籍が選択されていること
/// - 貸出中の書籍がないこと
/// - 貸出日は本日以降、返却予定日は貸出日から15日以内
pub async fn issue_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IssueBookRequest>,
) -> Result<(StatusCode, Json<IssuedResponse>), ApiError> {
    let cmd = req.to_command(state.today());

    let issued = loan_service::issue_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(IssuedResponse {
            loan: issued.loan,
            message: issued.message,
        }),
    ))
}

/// POST /loans/return - 返却処理（罰金を計算）
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReturnBookRequest>,
) -> Result<Json<ReturnedResponse>, ApiError> {
    let returned = loan_service::return_book(&state.service_deps, req.to_command()).await?;

    Ok(Json(ReturnedResponse {
        loan: returned.loan,
        message: returned.message,
    }))
}

/// POST /loans/settle - 罰金を精算して返却を完了
pub async fn settle_fine(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SettleFineRequest>,
) -> Result<Json<SettledResponse>, ApiError> {
    let cmd = req.to_command(state.today());

    let settled = loan_service::settle_fine(&state.service_deps, cmd).await?;

    Ok(Json(SettledResponse {
        settlement: settled.settlement,
        message: settled.message,
    }))
}

/// GET /loans/active - 貸出カウンターの現況
pub async fn desk_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeskStatus>, ApiError> {
    let status = loan_service::desk_status(&state.service_deps).await?;
    Ok(Json(status))
}

// ============================================================================
// Memberships
// ============================================================================

/// POST /memberships - 会員登録
pub async fn create_membership(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>), ApiError> {
    let registered =
        membership_service::create_membership(&state.service_deps, req.to_command()).await?;

    Ok((
        StatusCode::CREATED,
        Json(MembershipResponse {
            membership: registered.membership,
            message: registered.message,
        }),
    ))
}

/// POST /memberships/update - 取消・延長
pub async fn update_membership(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateMembershipRequest>,
) -> Result<Json<MembershipResponse>, ApiError> {
    let cmd = req.to_command(state.today());

    match membership_service::update_membership(&state.service_deps, cmd).await? {
        MembershipUpdate::Updated {
            membership,
            message,
        } => Ok(Json(MembershipResponse {
            membership,
            message,
        })),
        MembershipUpdate::NotFound { message } => Err(ApiError::not_found(message)),
    }
}

/// GET /memberships - 会員一覧
pub async fn list_memberships(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MembershipView>>, ApiError> {
    let memberships =
        membership_service::list_memberships(&state.service_deps, state.today()).await?;
    Ok(Json(memberships))
}

/// GET /memberships/:number - 会員照会
pub async fn get_membership(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<MembershipView>, ApiError> {
    membership_service::get_membership(&state.service_deps, &number, state.today())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Membership not found"))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /admin/books - 書籍の追加（シリアル番号によるupsert）
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let saved = admin_service::add_book(&state.service_deps, req.to_command()).await?;
    book_response(saved)
}

/// POST /admin/books/update - 既存書籍の書名・著者を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveBookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let saved = admin_service::update_book(&state.service_deps, req.to_command()).await?;
    book_response(saved)
}

fn book_response(saved: BookSaved) -> Result<Json<BookResponse>, ApiError> {
    match saved {
        BookSaved::Saved { book, message } => Ok(Json(BookResponse { book, message })),
        BookSaved::NotFound { message } => Err(ApiError::not_found(message)),
    }
}

/// POST /admin/users - 利用者の登録・更新
pub async fn save_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    match admin_service::save_user(&state.service_deps, req.to_command()).await? {
        UserSaved::Saved { user, message } => Ok(Json(UserResponse { user, message })),
        UserSaved::NotFound { message } => Err(ApiError::not_found(message)),
    }
}

/// GET /admin/users - 登録済み利用者
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<crate::domain::user::User>>, ApiError> {
    let users = admin_service::list_users(&state.service_deps).await?;
    Ok(Json(users))
}

// ============================================================================
// Activity log
// ============================================================================

/// GET /events - 操作履歴
pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EventRecord>>, ApiError> {
    let events = activity_service::activity_log(&state.service_deps).await?;
    Ok(Json(events))
}
