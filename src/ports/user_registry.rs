use crate::domain::user::User;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 利用者台帳ポート
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// 名前で利用者を取得する（完全一致）
    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;

    /// 利用者を保存する（名前によるupsert）
    async fn save(&self, user: User) -> Result<()>;

    /// 登録順の全利用者
    async fn list(&self) -> Result<Vec<User>>;
}
