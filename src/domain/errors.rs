use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 入力フォームの項目
///
/// エラーメッセージをどの入力欄に表示するかを示す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    // ログイン
    LoginName,
    LoginPassword,
    LoginRole,

    // 蔵書検索
    Search,

    // 貸出
    IssueBook,
    IssueDate,
    IssueReturnDate,

    // 返却
    ReturnBook,
    ReturnSerial,
    ActualReturnDate,

    // 罰金精算
    Fine,

    // 会員
    MemberName,
    MemberStartDate,
    MemberDuration,
    MembershipNumber,
    MembershipAction,

    // 書籍管理
    BookKind,
    BookName,
    BookAuthor,
    BookSerial,

    // 利用者管理
    UserKind,
    UserName,
    UserPassword,
    UserRole,
}

/// 1項目分の入力エラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// 入力検証エラーの集合
///
/// 不変条件：空ではない（エラーがなければ`Ok`を返す）。
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", summary(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// 1項目のみのエラー
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field,
            message: message.into(),
        }])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// 指定項目のメッセージ
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: Field) -> bool {
        self.message_for(field).is_some()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }
}

/// 入力検証の収集器
///
/// 全項目を検証してからまとめて報告するために使う。
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// 必須入力。空白を除いた値を返す
    pub fn required<'a>(&mut self, field: Field, raw: &'a str, message: &str) -> Option<&'a str> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.push(field, message);
            None
        } else {
            Some(trimmed)
        }
    }

    /// 選択必須の値をパースする
    pub fn choice<T: std::str::FromStr>(
        &mut self,
        field: Field,
        raw: Option<&str>,
        missing: &str,
        invalid: &str,
    ) -> Option<T> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => {
                self.push(field, missing);
                None
            }
            Some(value) => match value.parse::<T>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    self.push(field, invalid);
                    None
                }
            },
        }
    }

    /// 必須の日付（`YYYY-MM-DD`）
    pub fn date(
        &mut self,
        field: Field,
        raw: &str,
        missing: &str,
    ) -> Option<chrono::NaiveDate> {
        let value = self.required(field, raw, missing)?;
        match chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                self.push(field, "Date must be in YYYY-MM-DD format");
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 記録済みのエラーを取り出す
    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors(self.errors)
    }
}
