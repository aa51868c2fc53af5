//! The stored form of an event.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AggregateId, Result, StreamId};

/// Identity of one stored event, independent of its position in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an aggregate in its stream.
///
/// A fresh aggregate is at version 0 and each event moves it forward by one,
/// so a stream's version is also its length.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Version of a stream with no events.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Version carried by the first event of a stream.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Steps back `count` events, stopping at the initial version.
    pub fn rewind(&self, count: usize) -> Self {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        Self(self.0.saturating_sub(count).max(0))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event as the store keeps it: where it sits and what kind it is, with
/// the payload left as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub aggregate_type: String,
    pub aggregate_id: AggregateId,

    /// Version of the aggregate once this event is applied.
    pub version: Version,

    /// Event kind, e.g. `"OrderPlaced"`.
    pub event_type: String,

    /// When the event was raised, not when it was stored.
    pub timestamp: DateTime<Utc>,

    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Wraps an encoded payload as event `version` of `stream`, raised now.
    pub fn new(
        stream: &StreamId,
        version: Version,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: EventId::generate(),
            aggregate_type: stream.aggregate_type.clone(),
            aggregate_id: stream.aggregate_id.clone(),
            version,
            event_type: event_type.into(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Encodes `payload` to JSON and wraps it.
    pub fn encode<T: Serialize>(
        stream: &StreamId,
        version: Version,
        event_type: impl Into<String>,
        payload: &T,
    ) -> Result<Self> {
        Ok(Self::new(
            stream,
            version,
            event_type,
            serde_json::to_value(payload)?,
        ))
    }

    /// Keeps the time the event was originally raised.
    pub fn raised_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn stream_id(&self) -> StreamId {
        StreamId::new(self.aggregate_type.clone(), self.aggregate_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn event_ids_are_unique() {
        assert_ne!(EventId::generate(), EventId::generate());
    }

    #[test]
    fn versions_count_events() {
        assert_eq!(Version::initial().next(), Version::first());
        assert!(Version::first() < Version::new(2));
        assert_eq!(Version::new(7).to_string(), "7");
    }

    #[test]
    fn rewind_stops_at_initial() {
        assert_eq!(Version::new(5).rewind(2), Version::new(3));
        assert_eq!(Version::new(1).rewind(4), Version::initial());
        assert_eq!(Version::new(1).rewind(usize::MAX), Version::initial());
    }

    #[test]
    fn envelope_takes_stream_coordinates() {
        let stream = StreamId::new("Order", "order-1");

        let envelope = EventEnvelope::encode(
            &stream,
            Version::first(),
            "OrderPlaced",
            &serde_json::json!({"customer_id": "cust-A"}),
        )
        .unwrap();

        assert_eq!(envelope.stream_id(), stream);
        assert_eq!(envelope.aggregate_type, "Order");
        assert_eq!(envelope.aggregate_id.as_str(), "order-1");
        assert_eq!(envelope.event_type, "OrderPlaced");
        assert_eq!(envelope.payload["customer_id"], "cust-A");
    }

    #[test]
    fn raised_at_overrides_timestamp() {
        let raised = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let envelope = EventEnvelope::new(
            &StreamId::new("Order", "order-1"),
            Version::first(),
            "OrderPlaced",
            serde_json::json!({}),
        )
        .raised_at(raised);

        assert_eq!(envelope.timestamp, raised);
    }
}
