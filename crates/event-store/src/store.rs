use serde::{Deserialize, Serialize};

use crate::{AggregateId, EventEnvelope, EventStoreError, Result, Version};

/// Identifies one event stream: the history of a single aggregate instance.
///
/// Two aggregate types may share an ID (an order and its inventory
/// reservation are both keyed by the order ID), so the type is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId {
    pub aggregate_type: String,
    pub aggregate_id: AggregateId,
}

impl StreamId {
    /// Creates a stream ID.
    pub fn new(aggregate_type: impl Into<String>, aggregate_id: impl Into<AggregateId>) -> Self {
        Self {
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
        }
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.aggregate_type, self.aggregate_id)
    }
}

/// Persistence boundary consumed by the command router.
///
/// Implementations must be thread-safe (Send + Sync) and must return a
/// stream's events in exactly the order they were appended.
pub trait EventStore: Send + Sync {
    /// Reads every event of a stream, oldest first.
    ///
    /// Returns an empty vector for a stream that has never been written.
    fn read(&self, stream: &StreamId) -> Result<Vec<EventEnvelope>>;

    /// Reads every event of every stream in the order they were appended.
    ///
    /// Events of one stream keep their stream order; events of different
    /// streams are interleaved as their appends happened.
    fn read_all(&self) -> Result<Vec<EventEnvelope>>;

    /// Appends events to a stream.
    ///
    /// Events are appended atomically - either all succeed or none do.
    /// Fails with `VersionConflict` if the stream's current version differs
    /// from `expected_version`.
    ///
    /// Returns the new version of the stream after appending.
    fn append(
        &self,
        stream: &StreamId,
        expected_version: Version,
        events: Vec<EventEnvelope>,
    ) -> Result<Version>;

    /// Gets the current version of a stream (0 if it has no events).
    fn stream_version(&self, stream: &StreamId) -> Result<Version> {
        Ok(self
            .read(stream)?
            .last()
            .map(|e| e.version)
            .unwrap_or(Version::initial()))
    }
}

/// Validates a batch before appending it on top of `expected_version`.
///
/// Every envelope must belong to `stream` and versions must continue the
/// stream without gaps.
pub fn validate_events_for_append(
    stream: &StreamId,
    expected_version: Version,
    events: &[EventEnvelope],
) -> Result<()> {
    if events.is_empty() {
        return Err(EventStoreError::InvalidAppend(
            "Cannot append empty event list".to_string(),
        ));
    }

    let mut next = expected_version;
    for event in events {
        if event.aggregate_id != stream.aggregate_id
            || event.aggregate_type != stream.aggregate_type
        {
            return Err(EventStoreError::InvalidAppend(format!(
                "Event {} belongs to {}, not {}",
                event.event_id,
                event.stream_id(),
                stream
            )));
        }

        next = next.next();
        if event.version != next {
            return Err(EventStoreError::InvalidAppend(format!(
                "Event versions must be sequential. Expected {}, got {}",
                next, event.version
            )));
        }
    }

    Ok(())
}
