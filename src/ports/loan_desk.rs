use crate::domain::loan::LoanDesk;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出カウンターポート
///
/// 選択中の書籍と、システム全体で1件だけの貸出枠を保持する。
#[async_trait]
pub trait LoanDeskStore: Send + Sync {
    /// 現在の状態を読み込む
    async fn load(&self) -> Result<LoanDesk>;

    /// 状態を丸ごと置き換える
    async fn save(&self, desk: LoanDesk) -> Result<()>;
}
