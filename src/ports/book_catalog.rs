use crate::domain::{Book, BookId, SerialNumber};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 蔵書カタログポート
///
/// 書籍の一覧・検索・追加・更新を抽象化する。
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// 登録順の全書籍
    async fn list(&self) -> Result<Vec<Book>>;

    /// IDで書籍を取得する
    async fn get(&self, book_id: BookId) -> Result<Option<Book>>;

    /// シリアル番号で書籍を取得する
    ///
    /// 管理画面の追加・更新で業務キーとして使用される。
    async fn find_by_serial(&self, serial_number: &SerialNumber) -> Result<Option<Book>>;

    /// 次に採番する書籍ID
    async fn next_id(&self) -> Result<BookId>;

    /// 書籍を保存する
    ///
    /// 同じIDがあれば置き換え、なければ末尾に追加する。
    async fn save(&self, book: Book) -> Result<()>;
}
