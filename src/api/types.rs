use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Book, BookId, FieldError, FineSettled, Role,
    commands::{
        CreateMembership, IssueBook, Login, ReturnBook, SaveBook, SaveUser, SelectBook, SettleFine,
        UpdateMembership,
    },
    loan::{ActiveLoan, ReturnedLoan},
    membership::Membership,
    user::{Session, User},
};

// ============================================================================
// Requests
// ============================================================================
//
// フォームの値はすべて文字列のまま受け取る。未入力の項目は空文字として扱い、
// 必須チェックはドメイン層の検証に任せる。

/// ログインリクエスト（POST /session/login）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
    pub role: Option<String>,
}

impl LoginRequest {
    pub fn to_command(self) -> Login {
        Login {
            name: self.name,
            password: self.password,
            role: self.role,
        }
    }
}

/// 蔵書検索のクエリパラメータ（GET /books/search）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub name: String,
    pub category: String,
}

/// 書籍選択リクエスト（POST /loans/select）
#[derive(Debug, Deserialize)]
pub struct SelectBookRequest {
    pub book_id: u32,
}

impl SelectBookRequest {
    pub fn to_command(self, today: NaiveDate) -> SelectBook {
        SelectBook {
            book_id: BookId::new(self.book_id),
            today,
        }
    }
}

/// 貸出リクエスト（POST /loans/issue）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IssueBookRequest {
    pub book_name: String,
    pub issue_date: String,
    pub return_date: String,
}

impl IssueBookRequest {
    pub fn to_command(self, today: NaiveDate) -> IssueBook {
        IssueBook {
            book_name: self.book_name,
            issue_date: self.issue_date,
            return_date: self.return_date,
            today,
        }
    }
}

/// 返却リクエスト（POST /loans/return）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReturnBookRequest {
    pub book_name: String,
    pub serial_number: String,
    pub actual_return_date: String,
}

impl ReturnBookRequest {
    pub fn to_command(self) -> ReturnBook {
        ReturnBook {
            book_name: self.book_name,
            serial_number: self.serial_number,
            actual_return_date: self.actual_return_date,
        }
    }
}

/// 罰金精算リクエスト（POST /loans/settle）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SettleFineRequest {
    pub paid: bool,
    pub remarks: Option<String>,
}

impl SettleFineRequest {
    pub fn to_command(self, today: NaiveDate) -> SettleFine {
        SettleFine {
            paid: self.paid,
            remarks: self.remarks,
            settled_on: today,
        }
    }
}

/// 会員登録リクエスト（POST /memberships）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateMembershipRequest {
    pub member_name: String,
    pub start_date: String,
    pub duration: Option<String>,
}

impl CreateMembershipRequest {
    pub fn to_command(self) -> CreateMembership {
        CreateMembership {
            member_name: self.member_name,
            start_date: self.start_date,
            duration: self.duration,
        }
    }
}

/// 会員更新リクエスト（POST /memberships/update）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMembershipRequest {
    pub membership_number: String,
    pub action: Option<String>,
}

impl UpdateMembershipRequest {
    pub fn to_command(self, today: NaiveDate) -> UpdateMembership {
        UpdateMembership {
            membership_number: self.membership_number,
            action: self.action,
            today,
        }
    }
}

/// 書籍の追加・更新リクエスト（POST /admin/books, POST /admin/books/update）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveBookRequest {
    pub kind: Option<String>,
    pub name: String,
    pub author: String,
    pub serial_number: String,
    pub category: Option<String>,
}

impl SaveBookRequest {
    pub fn to_command(self) -> SaveBook {
        SaveBook {
            kind: self.kind,
            name: self.name,
            author: self.author,
            serial_number: self.serial_number,
            category: self.category,
        }
    }
}

/// 利用者の登録・更新リクエスト（POST /admin/users）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveUserRequest {
    pub kind: Option<String>,
    pub name: String,
    pub password: String,
    pub role: Option<String>,
}

impl SaveUserRequest {
    pub fn to_command(self) -> SaveUser {
        SaveUser {
            kind: self.kind,
            name: self.name,
            password: self.password,
            role: self.role,
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_name: String,
    pub role: Role,
    pub message: String,
}

/// 現在のセッション（GET /session）
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub logged_in: bool,
    pub session: Option<Session>,
}

/// ログアウトレスポンス
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// 貸出レスポンス
#[derive(Debug, Serialize)]
pub struct IssuedResponse {
    pub loan: ActiveLoan,
    pub message: String,
}

/// 返却レスポンス
#[derive(Debug, Serialize)]
pub struct ReturnedResponse {
    pub loan: ReturnedLoan,
    pub message: String,
}

/// 精算レスポンス
#[derive(Debug, Serialize)]
pub struct SettledResponse {
    pub settlement: FineSettled,
    pub message: String,
}

/// 会員レスポンス
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub membership: Membership,
    pub message: String,
}

/// 書籍レスポンス（管理者）
#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: Book,
    pub message: String,
}

/// 利用者レスポンス（管理者）。パスワードは含まない
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
    pub message: String,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// 項目ごとの入力エラー（検証エラーの場合のみ）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = fields;
        self
    }
}
