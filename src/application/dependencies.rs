use crate::adapters::memory;
use crate::domain::Book;
use crate::ports::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// アプリケーション層の関数はすべてこの構造体を引数として受け取る。
///
/// `write_lock`は状態を変更する操作の全体（読込→検証→保存）を直列化する。
/// 同時に実行される論理操作は常に1つだけになる。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub catalog: Arc<dyn BookCatalog>,
    pub memberships: Arc<dyn MembershipRegistry>,
    pub users: Arc<dyn UserRegistry>,
    pub loan_desk: Arc<dyn LoanDeskStore>,
    pub session: Arc<dyn SessionStore>,
    pub event_log: Arc<dyn EventLog>,
    pub write_lock: Arc<Mutex<()>>,
}

impl ServiceDependencies {
    /// インメモリアダプターで依存関係を組み立てる
    pub fn in_memory(books: Vec<Book>) -> Self {
        Self {
            catalog: Arc::new(memory::BookCatalog::with_books(books)),
            memberships: Arc::new(memory::MembershipRegistry::new()),
            users: Arc::new(memory::UserRegistry::new()),
            loan_desk: Arc::new(memory::LoanDeskStore::new()),
            session: Arc::new(memory::SessionStore::new()),
            event_log: Arc::new(memory::EventLog::new()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}
