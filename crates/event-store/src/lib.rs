//! Event persistence boundary and an in-memory implementation.
//!
//! The kernel only needs two operations from storage: read a stream in
//! append order, and append to it with an expected version. Anything more
//! durable plugs in behind [`EventStore`].

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventId, Version};
pub use memory::InMemoryEventStore;
pub use store::{EventStore, StreamId, validate_events_for_append};
