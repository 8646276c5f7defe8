use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookId, Fine, LoanId, MembershipNumber, Role, SerialNumber};

/// イベント：貸出する書籍が選択された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSelected {
    pub book_id: BookId,
    pub selected_on: NaiveDate,
}

/// イベント：書籍が貸し出された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookIssued {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub serial_number: SerialNumber,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// イベント：書籍が返却された（罰金は未精算）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookReturned {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub returned_on: NaiveDate,
    pub late_days: i64,
    pub pending_fine: Fine,
}

/// イベント：罰金が精算され、貸出が完了した
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineSettled {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub amount: Fine,
    pub paid: bool,
    pub remarks: Option<String>,
    pub settled_on: NaiveDate,
}

/// イベント：会員が登録された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipCreated {
    pub membership_number: MembershipNumber,
    pub member_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// イベント：会員資格が取り消された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipCancelled {
    pub membership_number: MembershipNumber,
    pub old_end_date: NaiveDate,
    pub new_end_date: NaiveDate,
}

/// イベント：会員資格が延長された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipExtended {
    pub membership_number: MembershipNumber,
    pub months: u32,
    pub old_end_date: NaiveDate,
    pub new_end_date: NaiveDate,
}

/// イベント：書籍が追加された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAdded {
    pub book_id: BookId,
    pub serial_number: SerialNumber,
    pub name: String,
    pub category: String,
}

/// イベント：書籍情報が更新された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdated {
    pub book_id: BookId,
    pub serial_number: SerialNumber,
    pub name: String,
    pub author: String,
}

/// イベント：利用者が登録された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub name: String,
    pub role: Role,
}

/// イベント：利用者のパスワード・役割が更新された
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdated {
    pub name: String,
    pub role: Role,
}

/// イベント：ログインした
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoggedIn {
    pub name: String,
    pub role: Role,
}

/// イベント：ログアウトした
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLoggedOut {
    pub name: String,
}

/// ドメインイベント統合型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DomainEvent {
    BookSelected(BookSelected),
    BookIssued(BookIssued),
    BookReturned(BookReturned),
    FineSettled(FineSettled),
    MembershipCreated(MembershipCreated),
    MembershipCancelled(MembershipCancelled),
    MembershipExtended(MembershipExtended),
    BookAdded(BookAdded),
    BookUpdated(BookUpdated),
    UserCreated(UserCreated),
    UserUpdated(UserUpdated),
    UserLoggedIn(UserLoggedIn),
    UserLoggedOut(UserLoggedOut),
}

impl DomainEvent {
    /// イベント種別の識別子
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::BookSelected(_) => "BookSelected",
            DomainEvent::BookIssued(_) => "BookIssued",
            DomainEvent::BookReturned(_) => "BookReturned",
            DomainEvent::FineSettled(_) => "FineSettled",
            DomainEvent::MembershipCreated(_) => "MembershipCreated",
            DomainEvent::MembershipCancelled(_) => "MembershipCancelled",
            DomainEvent::MembershipExtended(_) => "MembershipExtended",
            DomainEvent::BookAdded(_) => "BookAdded",
            DomainEvent::BookUpdated(_) => "BookUpdated",
            DomainEvent::UserCreated(_) => "UserCreated",
            DomainEvent::UserUpdated(_) => "UserUpdated",
            DomainEvent::UserLoggedIn(_) => "UserLoggedIn",
            DomainEvent::UserLoggedOut(_) => "UserLoggedOut",
        }
    }
}
