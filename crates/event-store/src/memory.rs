use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    EventEnvelope, EventStoreError, Result, StreamId, Version,
    store::{EventStore, validate_events_for_append},
};

#[derive(Default)]
struct Log {
    streams: HashMap<StreamId, Vec<EventEnvelope>>,
    /// Stream and index of every stored event, in append order.
    appended: Vec<(StreamId, usize)>,
}

impl Log {
    fn version_of(&self, stream: &StreamId) -> Version {
        self.streams
            .get(stream)
            .and_then(|events| events.last())
            .map(|e| e.version)
            .unwrap_or(Version::initial())
    }
}

/// In-memory event store.
///
/// Streams live in a map guarded by a single lock, so an append checks the
/// expected version and extends the stream atomically. Clones share the
/// same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    log: Arc<RwLock<Log>>,
}

impl InMemoryEventStore {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored across all streams.
    pub fn event_count(&self) -> usize {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .appended
            .len()
    }

    /// Returns the IDs of every stream that holds at least one event.
    pub fn streams(&self) -> Vec<StreamId> {
        self.log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .streams
            .keys()
            .cloned()
            .collect()
    }
}

impl EventStore for InMemoryEventStore {
    fn read(&self, stream: &StreamId) -> Result<Vec<EventEnvelope>> {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        Ok(log.streams.get(stream).cloned().unwrap_or_default())
    }

    fn read_all(&self) -> Result<Vec<EventEnvelope>> {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        Ok(log
            .appended
            .iter()
            .filter_map(|(stream, index)| log.streams.get(stream)?.get(*index).cloned())
            .collect())
    }

    fn append(
        &self,
        stream: &StreamId,
        expected_version: Version,
        events: Vec<EventEnvelope>,
    ) -> Result<Version> {
        validate_events_for_append(stream, expected_version, &events)?;

        let mut log = self.log.write().unwrap_or_else(PoisonError::into_inner);
        let current_version = log.version_of(stream);

        if current_version != expected_version {
            tracing::debug!(
                %stream,
                expected = %expected_version,
                actual = %current_version,
                "rejecting append on stale version"
            );
            return Err(EventStoreError::VersionConflict {
                stream: stream.clone(),
                expected: expected_version,
                actual: current_version,
            });
        }

        let last_version = events
            .last()
            .map(|e| e.version)
            .unwrap_or(current_version);

        let Log { streams, appended } = &mut *log;
        let entry = streams.entry(stream.clone()).or_default();
        appended.extend((entry.len()..entry.len() + events.len()).map(|i| (stream.clone(), i)));
        entry.extend(events);

        Ok(last_version)
    }

    fn stream_version(&self, stream: &StreamId) -> Result<Version> {
        let log = self.log.read().unwrap_or_else(PoisonError::into_inner);
        Ok(log.version_of(stream))
    }
}
