use futures::TryStreamExt;

use crate::ports::EventRecord;

use super::{LibraryApplicationError, Result, ServiceDependencies};

/// 操作履歴を追加順に取得する
pub async fn activity_log(deps: &ServiceDependencies) -> Result<Vec<EventRecord>> {
    deps.event_log
        .stream_all()
        .try_collect()
        .await
        .map_err(LibraryApplicationError::EventLogError)
}
