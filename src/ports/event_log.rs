use crate::domain::events::DomainEvent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 記録済みのイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// 1から始まる通し番号
    pub sequence: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: DomainEvent,
}

/// 操作履歴ポート
///
/// 成功した操作のドメインイベントを追記専用ログに保存する。
#[async_trait]
pub trait EventLog: Send + Sync {
    /// イベントを追加する
    ///
    /// イベントの順序は保持される。
    async fn append(&self, events: Vec<DomainEvent>) -> Result<()>;

    /// 追加順にイベントをストリーム配信する
    fn stream_all(&self) -> BoxStream<'static, Result<EventRecord>>;
}
