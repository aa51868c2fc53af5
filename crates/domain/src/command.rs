//! Command handling infrastructure.
//!
//! A [`CommandRouter`] maps each command kind to exactly one aggregate type
//! and business method. Dispatching a command loads the target aggregate from
//! the store, runs the business method, appends the resulting events with an
//! optimistic-concurrency check and publishes them once they are committed.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use common::AggregateId;
use event_store::{EventEnvelope, EventStore, EventStoreError, StreamId, Version};

use crate::aggregate::{Aggregate, AggregateRoot, VersionedEvent};
use crate::config::RouterConfig;
use crate::error::DomainError;
use crate::sink::Sink;

/// Trait for commands: requests to change one aggregate.
///
/// Commands represent an intention to perform an action. Whether the action
/// is allowed is decided by the aggregate, which records a rejection event
/// when it is not.
pub trait Command: fmt::Debug + Send + Sync {
    /// Returns the command kind, used to pick a route.
    fn kind(&self) -> &'static str;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> &AggregateId;

    /// Returns human-readable violations; empty means the command is well formed.
    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require(&mut violations, "AggregateId", self.aggregate_id().as_str());
        violations
    }
}

/// Records a violation when a required field is blank.
pub fn require(violations: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(format!("{field} is required"));
    }
}

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// The stream the command was executed against.
    pub stream: StreamId,

    /// The stream version after the command.
    pub version: Version,

    /// How many events were appended and published.
    pub published: usize,

    /// How many times the command ran, conflicts included.
    pub attempts: u32,
}

/// The parts of a loaded aggregate the router needs once the business method
/// has run, with the event type erased to the router's event type.
trait PendingChanges<E> {
    fn committed_version(&self) -> Version;
    fn has_uncommitted_events(&self) -> bool;
    fn to_envelopes(&self) -> Result<Vec<EventEnvelope>, DomainError>;
    fn commit(&mut self) -> Vec<VersionedEvent<E>>;
}

impl<A, E> PendingChanges<E> for AggregateRoot<A>
where
    A: Aggregate,
    A::Event: Into<E>,
{
    fn committed_version(&self) -> Version {
        AggregateRoot::committed_version(self)
    }

    fn has_uncommitted_events(&self) -> bool {
        AggregateRoot::has_uncommitted_events(self)
    }

    fn to_envelopes(&self) -> Result<Vec<EventEnvelope>, DomainError> {
        AggregateRoot::to_envelopes(self)
    }

    fn commit(&mut self) -> Vec<VersionedEvent<E>> {
        let events = self
            .uncommitted_events()
            .iter()
            .cloned()
            .map(|event| event.map(Into::into))
            .collect();
        self.mark_events_as_committed();
        events
    }
}

type Execute<C, E> = Box<
    dyn Fn(&C, &[EventEnvelope]) -> Result<Option<Box<dyn PendingChanges<E>>>, DomainError>
        + Send
        + Sync,
>;

struct Route<C, E> {
    aggregate_type: &'static str,
    execute: Execute<C, E>,
}

/// Routes commands of type `C` to aggregates whose events convert into `E`.
pub struct CommandRouter<C, E> {
    routes: HashMap<&'static str, Route<C, E>>,
    config: RouterConfig,
}

impl<C, E> CommandRouter<C, E>
where
    C: Command + 'static,
    E: 'static,
{
    /// Creates a router with no routes and default configuration.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            routes: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registers the business method that handles commands of `kind`.
    ///
    /// `handle` receives the rebuilt aggregate state and the command, and
    /// returns the events to raise. It returns `None` for a command it does
    /// not understand, which makes the dispatch fail as unroutable.
    /// Registering a kind twice replaces the earlier route.
    pub fn route<A, F>(mut self, kind: &'static str, handle: F) -> Self
    where
        A: Aggregate + 'static,
        A::Event: Into<E> + 'static,
        F: Fn(&A, &C) -> Option<Vec<A::Event>> + Send + Sync + 'static,
    {
        let execute: Execute<C, E> = Box::new(
            move |command: &C,
                  history: &[EventEnvelope]|
                  -> Result<Option<Box<dyn PendingChanges<E>>>, DomainError> {
                let mut root = AggregateRoot::<A>::new(command.aggregate_id().clone());
                root.load_from_envelopes(history)?;

                let Some(events) = handle(root.state(), command) else {
                    return Ok(None);
                };
                for event in events {
                    root.raise(event);
                }
                Ok(Some(Box::new(root)))
            },
        );

        let route = Route {
            aggregate_type: A::aggregate_type(),
            execute,
        };
        if self.routes.insert(kind, route).is_some() {
            tracing::warn!(kind, "replacing existing command route");
        }
        self
    }

    /// Returns true if commands of `kind` can be dispatched.
    pub fn is_routed(&self, kind: &str) -> bool {
        self.routes.contains_key(kind)
    }

    /// Returns the aggregate type commands of `kind` are routed to.
    pub fn aggregate_type_for(&self, kind: &str) -> Option<&'static str> {
        self.routes.get(kind).map(|route| route.aggregate_type)
    }

    /// Executes a command and publishes the events it produces.
    ///
    /// 1. Validates the command and looks up its route
    /// 2. Rebuilds the target aggregate from its stream
    /// 3. Runs the business method and appends the new events, expecting the
    ///    version the aggregate was rebuilt at
    /// 4. On a version conflict, starts over from step 2, up to
    ///    `max_retries` more times
    /// 5. Publishes the committed events to `publish`, in order
    ///
    /// A command whose business method raises nothing appends and publishes
    /// nothing.
    #[tracing::instrument(
        skip(self, store, command, publish),
        fields(kind = command.kind(), aggregate_id = %command.aggregate_id())
    )]
    pub fn dispatch<S, P>(
        &self,
        store: &S,
        command: &C,
        publish: &mut P,
    ) -> Result<Dispatched, DomainError>
    where
        S: EventStore + ?Sized,
        P: Sink<VersionedEvent<E>>,
    {
        let started = Instant::now();
        let kind = command.kind();

        let violations = command.validate();
        if !violations.is_empty() {
            return Err(DomainError::InvalidCommand { kind, violations });
        }

        let route = self
            .routes
            .get(kind)
            .ok_or(DomainError::UnroutableCommand { kind })?;
        let stream = StreamId::new(route.aggregate_type, command.aggregate_id().clone());

        let max_attempts = self.config.max_attempts();
        for attempt in 1..=max_attempts {
            let history = store.read(&stream)?;
            let mut pending = (route.execute)(command, &history)?
                .ok_or(DomainError::UnroutableCommand { kind })?;
            let expected_version = pending.committed_version();

            if !pending.has_uncommitted_events() {
                tracing::debug!(%stream, "command raised no events");
                metrics::counter!("commands_dispatched_total").increment(1);
                return Ok(Dispatched {
                    stream,
                    version: expected_version,
                    published: 0,
                    attempts: attempt,
                });
            }

            let envelopes = pending.to_envelopes()?;
            match store.append(&stream, expected_version, envelopes) {
                Ok(version) => {
                    let events = pending.commit();
                    let published = events.len();
                    for event in events {
                        publish.publish(event);
                    }

                    metrics::counter!("commands_dispatched_total").increment(1);
                    metrics::counter!("events_published_total").increment(published as u64);
                    metrics::histogram!("command_dispatch_seconds")
                        .record(started.elapsed().as_secs_f64());
                    tracing::debug!(%stream, %version, published, "command committed");

                    return Ok(Dispatched {
                        stream,
                        version,
                        published,
                        attempts: attempt,
                    });
                }
                Err(EventStoreError::VersionConflict {
                    expected, actual, ..
                }) => {
                    metrics::counter!("command_conflicts_total").increment(1);
                    tracing::warn!(
                        %stream,
                        attempt,
                        %expected,
                        %actual,
                        "version conflict, rebuilding aggregate"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::ConcurrencyConflict {
            stream,
            attempts: max_attempts,
        })
    }
}

impl<C, E> Default for CommandRouter<C, E>
where
    C: Command + 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> fmt::Debug for CommandRouter<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.routes.keys().collect();
        kinds.sort();
        f.debug_struct("CommandRouter")
            .field("routes", &kinds)
            .field("config", &self.config)
            .finish()
    }
}
