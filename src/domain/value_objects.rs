use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 延滞1日あたりの罰金額
pub const FINE_PER_LATE_DAY: u32 = 10;

/// 書籍ID - カタログ内で連番で採番される
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(u32);

impl BookId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// 次の連番
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 貸出ID - 貸出枠に入った1回の貸出を識別する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

/// 書籍のシリアル番号（業務キー）
///
/// 前後の空白を取り除いた空でない文字列。比較は大文字小文字を区別する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// 入力文字列から生成する。空白のみの場合は`None`
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会員番号
///
/// 形式：`MEM` + 5桁の数字（10000〜99999）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipNumber(String);

impl MembershipNumber {
    pub const PREFIX: &'static str = "MEM";

    /// 乱数から新しい会員番号を生成する
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let digits: u32 = rng.gen_range(10_000..100_000);
        Self(format!("{}{}", Self::PREFIX, digits))
    }

    /// 入力された会員番号。空白のみの場合は`None`
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MembershipNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 利用者の役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 会員期間（作成時に選択）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipDuration {
    SixMonths,
    TwelveMonths,
}

impl MembershipDuration {
    pub fn months(&self) -> u32 {
        match self {
            MembershipDuration::SixMonths => 6,
            MembershipDuration::TwelveMonths => 12,
        }
    }
}

impl std::str::FromStr for MembershipDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "6" => Ok(MembershipDuration::SixMonths),
            "12" => Ok(MembershipDuration::TwelveMonths),
            other => Err(format!("Invalid membership duration: {}", other)),
        }
    }
}

/// 会員情報の更新操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipAction {
    /// 終了日を本日にする
    Cancel,
    /// 現在の終了日から6か月延長
    Extend6,
    /// 現在の終了日から12か月延長
    Extend12,
}

impl MembershipAction {
    /// 延長する月数（取消の場合は`None`）
    pub fn extension_months(&self) -> Option<u32> {
        match self {
            MembershipAction::Cancel => None,
            MembershipAction::Extend6 => Some(6),
            MembershipAction::Extend12 => Some(12),
        }
    }
}

impl std::str::FromStr for MembershipAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cancel" => Ok(MembershipAction::Cancel),
            "extend6" => Ok(MembershipAction::Extend6),
            "extend12" => Ok(MembershipAction::Extend12),
            other => Err(format!("Invalid membership action: {}", other)),
        }
    }
}

/// 管理画面の「新規／既存」選択
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    New,
    Existing,
}

impl std::str::FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(RecordKind::New),
            "existing" => Ok(RecordKind::Existing),
            other => Err(format!("Invalid record kind: {}", other)),
        }
    }
}

/// 延滞罰金
///
/// 不変条件：金額は延滞日数 × `FINE_PER_LATE_DAY`。期限内の返却は0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fine(u32);

impl Fine {
    pub fn zero() -> Self {
        Self(0)
    }

    /// 延滞日数から罰金を計算する（0以下は罰金なし）
    pub fn for_late_days(late_days: i64) -> Self {
        if late_days <= 0 {
            return Self::zero();
        }
        let days = u32::try_from(late_days).unwrap_or(u32::MAX);
        Self(days.saturating_mul(FINE_PER_LATE_DAY))
    }

    pub fn amount(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}
