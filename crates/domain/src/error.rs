//! Domain error types.

use common::AggregateId;
use event_store::{EventStoreError, StreamId, Version};
use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// Business rejections are not errors: they are recorded as events
/// (`ItemCannotBeAdded`, ...). Everything here is either a wiring mistake,
/// a corrupted stream, or an infrastructure failure.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A stored event kind has no handler on the aggregate it was loaded into.
    #[error("Aggregate {aggregate_type} has no handler for event kind {event_type}")]
    UnhandledEventKind {
        aggregate_type: String,
        event_type: String,
    },

    /// No route is registered for a command kind.
    #[error("No route registered for command {kind}")]
    UnroutableCommand { kind: &'static str },

    /// The command failed its own validation.
    #[error("Invalid {kind} command: {}", .violations.join("; "))]
    InvalidCommand {
        kind: &'static str,
        violations: Vec<String>,
    },

    /// A loaded event does not continue the aggregate's version sequence.
    #[error("Event history of {aggregate_id} is out of order: expected version {expected}, found {found}")]
    HistoryOutOfOrder {
        aggregate_id: AggregateId,
        expected: Version,
        found: Version,
    },

    /// A loaded event belongs to a different aggregate instance.
    #[error("Event for aggregate {found} cannot be loaded into {expected}")]
    ForeignEvent {
        expected: AggregateId,
        found: AggregateId,
    },

    /// Every optimistic-concurrency retry lost against concurrent writers.
    #[error("Stream {stream} kept changing, gave up after {attempts} attempts")]
    ConcurrencyConflict { stream: StreamId, attempts: u32 },

    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns true for mistakes in how the router or aggregates are wired,
    /// as opposed to data or infrastructure failures.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            DomainError::UnhandledEventKind { .. } | DomainError::UnroutableCommand { .. }
        )
    }

    /// Returns true when the router exhausted its retries on a contended stream.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, DomainError::ConcurrencyConflict { .. })
    }
}
