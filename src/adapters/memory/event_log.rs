use crate::domain::events::DomainEvent;
use crate::ports::event_log::{EventLog as EventLogTrait, EventRecord, Result};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Mutex;

use super::lock;

/// In-memory implementation of EventLog
///
/// Append-only; records are numbered from 1 in insertion order.
#[derive(Default)]
pub struct EventLog {
    records: Mutex<Vec<EventRecord>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventLogTrait for EventLog {
    async fn append(&self, events: Vec<DomainEvent>) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let mut records = lock(&self.records)?;
        let recorded_at = chrono::Utc::now();
        for event in events {
            let sequence = records.len() as u64 + 1;
            tracing::debug!(sequence, event_type = event.event_type(), "event appended");
            records.push(EventRecord {
                sequence,
                recorded_at,
                event,
            });
        }
        Ok(())
    }

    /// Streams a snapshot taken when the stream is created
    fn stream_all(&self) -> BoxStream<'static, Result<EventRecord>> {
        let snapshot = match lock(&self.records) {
            Ok(records) => records.clone(),
            Err(e) => return stream::once(async move { Err(e) }).boxed(),
        };
        stream::iter(snapshot.into_iter().map(Ok)).boxed()
    }
}
