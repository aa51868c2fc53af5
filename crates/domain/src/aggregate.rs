//! Core aggregate and domain event traits.
//!
//! An aggregate's state is never mutated directly: business methods return
//! events, and [`Aggregate::apply`] folds each event into the state. An
//! [`AggregateRoot`] wraps that state with the identity, version and
//! not-yet-persisted events needed to store it.

use chrono::{DateTime, Utc};
use common::AggregateId;
use event_store::{EventEnvelope, StreamId, Version};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::DomainError;

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent:
    Serialize + DeserializeOwned + Clone + std::fmt::Debug + Send + Sync
{
    /// Every kind this event type can take, as returned by [`event_type`].
    ///
    /// Stored events whose kind is missing from this list cannot be loaded.
    ///
    /// [`event_type`]: DomainEvent::event_type
    const EVENT_TYPES: &'static [&'static str];

    /// Returns the event type name.
    ///
    /// This is used for serialization and event store filtering.
    fn event_type(&self) -> &'static str;

    /// Returns true if `event_type` names one of this type's kinds.
    fn handles(event_type: &str) -> bool {
        Self::EVENT_TYPES.contains(&event_type)
    }
}

/// Trait for aggregate state in an event-sourced system.
///
/// Implementations must keep `apply` pure: given the same state and event it
/// always produces the same new state, has no side effects and never fails.
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    ///
    /// Used as the first half of the stream key and for routing.
    fn aggregate_type() -> &'static str;

    /// Applies an event to the aggregate, updating its state.
    fn apply(&mut self, event: &Self::Event);

    /// Rebuilds state by folding `events` into the default state.
    fn replay<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self::Event: 'a,
    {
        events.into_iter().fold(Self::default(), |mut state, event| {
            state.apply(event);
            state
        })
    }
}

/// An event stamped with the aggregate it belongs to and its position in that
/// aggregate's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedEvent<E> {
    pub aggregate_id: AggregateId,
    pub version: Version,
    pub timestamp: DateTime<Utc>,
    pub payload: E,
}

impl<E> VersionedEvent<E> {
    /// Stamps a payload with the current time.
    pub fn new(aggregate_id: AggregateId, version: Version, payload: E) -> Self {
        Self {
            aggregate_id,
            version,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Converts the payload while keeping the stamp.
    pub fn map<F>(self, f: impl FnOnce(E) -> F) -> VersionedEvent<F> {
        VersionedEvent {
            aggregate_id: self.aggregate_id,
            version: self.version,
            timestamp: self.timestamp,
            payload: f(self.payload),
        }
    }
}

impl<E: DomainEvent> VersionedEvent<E> {
    /// Decodes a stored envelope for an aggregate of `aggregate_type`.
    ///
    /// Fails with `UnhandledEventKind` when the stored kind is not one of
    /// `E`'s kinds.
    pub fn from_envelope(aggregate_type: &str, envelope: &EventEnvelope) -> Result<Self, DomainError> {
        if !E::handles(&envelope.event_type) {
            return Err(DomainError::UnhandledEventKind {
                aggregate_type: aggregate_type.to_string(),
                event_type: envelope.event_type.clone(),
            });
        }

        let payload: E = serde_json::from_value(envelope.payload.clone())?;
        Ok(Self {
            aggregate_id: envelope.aggregate_id.clone(),
            version: envelope.version,
            timestamp: envelope.timestamp,
            payload,
        })
    }

    /// Encodes the event for storage in an `aggregate_type` stream.
    pub fn to_envelope(&self, aggregate_type: &str) -> Result<EventEnvelope, DomainError> {
        let stream = StreamId::new(aggregate_type, self.aggregate_id.clone());
        let envelope =
            EventEnvelope::encode(&stream, self.version, self.payload.event_type(), &self.payload)?;
        Ok(envelope.raised_at(self.timestamp))
    }
}

/// Event types that span several aggregates and can be decoded from any
/// stored envelope of the system they describe.
///
/// Implementations dispatch on `envelope.aggregate_type` and fail with
/// `UnhandledEventKind` for streams they do not know.
pub trait FromEnvelope: Sized {
    fn from_envelope(envelope: &EventEnvelope) -> Result<Self, DomainError>;
}

/// An aggregate instance: identity, version, current state and the events
/// raised since it was loaded.
///
/// `version` counts every event applied, committed or not, so
/// `committed_version()` is the version the stream must still be at for the
/// uncommitted events to be appended.
#[derive(Debug, Clone)]
pub struct AggregateRoot<A: Aggregate> {
    id: AggregateId,
    version: Version,
    state: A,
    uncommitted: Vec<VersionedEvent<A::Event>>,
}

impl<A: Aggregate> AggregateRoot<A> {
    /// Creates a fresh aggregate at version 0.
    pub fn new(id: impl Into<AggregateId>) -> Self {
        Self {
            id: id.into(),
            version: Version::initial(),
            state: A::default(),
            uncommitted: Vec::new(),
        }
    }

    pub fn id(&self) -> &AggregateId {
        &self.id
    }

    /// Returns the version after every applied event, uncommitted ones included.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns the version of the last persisted event.
    pub fn committed_version(&self) -> Version {
        self.version.rewind(self.uncommitted.len())
    }

    pub fn state(&self) -> &A {
        &self.state
    }

    /// Returns the stream this aggregate is stored in.
    pub fn stream_id(&self) -> StreamId {
        StreamId::new(A::aggregate_type(), self.id.clone())
    }

    /// Replays already-persisted events.
    ///
    /// Each event must belong to this aggregate and carry exactly the next
    /// version. The whole batch is checked before any of it is applied, so a
    /// failed load leaves the root untouched.
    pub fn load_from_history<I>(&mut self, events: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = VersionedEvent<A::Event>>,
    {
        let events: Vec<_> = events.into_iter().collect();

        let mut expected = self.version;
        for event in &events {
            if event.aggregate_id != self.id {
                return Err(DomainError::ForeignEvent {
                    expected: self.id.clone(),
                    found: event.aggregate_id.clone(),
                });
            }
            expected = expected.next();
            if event.version != expected {
                return Err(DomainError::HistoryOutOfOrder {
                    aggregate_id: self.id.clone(),
                    expected,
                    found: event.version,
                });
            }
        }

        for event in &events {
            self.state.apply(&event.payload);
        }
        self.version = expected;
        Ok(())
    }

    /// Decodes stored envelopes and replays them.
    pub fn load_from_envelopes(&mut self, envelopes: &[EventEnvelope]) -> Result<(), DomainError> {
        let events = envelopes
            .iter()
            .map(|envelope| VersionedEvent::from_envelope(A::aggregate_type(), envelope))
            .collect::<Result<Vec<_>, _>>()?;
        self.load_from_history(events)
    }

    /// Applies a new event and records it as uncommitted.
    pub fn raise(&mut self, event: A::Event) {
        self.state.apply(&event);
        self.version = self.version.next();
        self.uncommitted
            .push(VersionedEvent::new(self.id.clone(), self.version, event));
    }

    /// Runs a business method against the current state and raises every
    /// event it returns. Returns the number of events raised.
    pub fn execute<F>(&mut self, decide: F) -> usize
    where
        F: FnOnce(&A) -> Vec<A::Event>,
    {
        let events = decide(&self.state);
        let count = events.len();
        for event in events {
            self.raise(event);
        }
        count
    }

    /// Returns events raised since the last commit, oldest first.
    pub fn uncommitted_events(&self) -> &[VersionedEvent<A::Event>] {
        &self.uncommitted
    }

    pub fn has_uncommitted_events(&self) -> bool {
        !self.uncommitted.is_empty()
    }

    /// Forgets the uncommitted events once they are persisted.
    ///
    /// The version does not move: it already counts them.
    pub fn mark_events_as_committed(&mut self) {
        self.uncommitted.clear();
    }

    /// Encodes the uncommitted events for appending to the stream.
    pub fn to_envelopes(&self) -> Result<Vec<EventEnvelope>, DomainError> {
        self.uncommitted
            .iter()
            .map(|event| event.to_envelope(A::aggregate_type()))
            .collect()
    }
}
