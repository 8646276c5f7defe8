//! 入力フォームに対応するコマンド
//!
//! 値は画面から受け取ったままの文字列で、検証はドメインの純粋関数が行う。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BookId;

/// コマンド：ログインする
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Login {
    pub name: String,
    pub password: String,
    pub role: Option<String>,
}

/// コマンド：検索結果から書籍を選択する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectBook {
    pub book_id: BookId,
    pub today: NaiveDate,
}

/// コマンド：選択中の書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueBook {
    pub book_name: String,
    pub issue_date: String,
    pub return_date: String,
    pub today: NaiveDate,
}

/// コマンド：貸出中の書籍を返却する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnBook {
    pub book_name: String,
    pub serial_number: String,
    pub actual_return_date: String,
}

/// コマンド：罰金を精算して返却を完了する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleFine {
    pub paid: bool,
    pub remarks: Option<String>,
    pub settled_on: NaiveDate,
}

/// コマンド：会員を登録する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMembership {
    pub member_name: String,
    pub start_date: String,
    /// "6" または "12"
    pub duration: Option<String>,
}

/// コマンド：会員資格を取消・延長する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMembership {
    pub membership_number: String,
    /// "cancel" / "extend6" / "extend12"
    pub action: Option<String>,
    pub today: NaiveDate,
}

/// コマンド：書籍を追加・更新する（管理者）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveBook {
    /// "new" または "existing"
    pub kind: Option<String>,
    pub name: String,
    pub author: String,
    pub serial_number: String,
    pub category: Option<String>,
}

/// コマンド：利用者を登録・更新する（管理者）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveUser {
    /// "new" または "existing"
    pub kind: Option<String>,
    pub name: String,
    pub password: String,
    pub role: Option<String>,
}
