use crate::domain::{MembershipNumber, membership::Membership};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 会員台帳ポート
#[async_trait]
pub trait MembershipRegistry: Send + Sync {
    /// 会員番号で会員を取得する
    async fn get(&self, number: &MembershipNumber) -> Result<Option<Membership>>;

    /// 会員番号が使用済みか
    ///
    /// 会員番号採番時の重複確認に使用される。
    async fn contains(&self, number: &MembershipNumber) -> Result<bool>;

    /// 会員を保存する（会員番号によるupsert）
    async fn save(&self, membership: Membership) -> Result<()>;

    /// 登録順の全会員
    async fn list(&self) -> Result<Vec<Membership>>;
}
