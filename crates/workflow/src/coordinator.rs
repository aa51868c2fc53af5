//! Coordinator that closes the event → policy → command loop.

use std::collections::VecDeque;

use domain::{
    Command, CommandRouter, FromEnvelope, History, Outbox, Policy, Sink, VersionedEvent,
};
use event_store::EventStore;

use crate::config::CoordinatorConfig;
use crate::error::{Result, WorkflowError};

/// Drives commands through the router and feeds the published events to the
/// policies.
///
/// The coordinator keeps the policy history in memory: every command it
/// dispatched and every event it published, in order. Each policy sees the
/// history as it was before the triggering event. A coordinator started over
/// a store that already holds events should be built with
/// [`Coordinator::resume`] so that history is not lost.
pub struct Coordinator<S, C, E> {
    store: S,
    router: CommandRouter<C, E>,
    policies: Vec<Box<dyn Policy<E, C>>>,
    history: History<E, C>,
    config: CoordinatorConfig,
}

impl<S, C, E> Coordinator<S, C, E>
where
    S: EventStore,
    C: Command + 'static,
    E: Clone + 'static,
{
    /// Creates a coordinator with an empty history.
    pub fn new(
        store: S,
        router: CommandRouter<C, E>,
        policies: Vec<Box<dyn Policy<E, C>>>,
    ) -> Self {
        Self {
            store,
            router,
            policies,
            history: History::new(),
            config: CoordinatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Starts from a history recorded earlier.
    pub fn with_history(mut self, history: History<E, C>) -> Self {
        self.history = history;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns every command dispatched and event published so far.
    pub fn history(&self) -> &History<E, C> {
        &self.history
    }

    /// Dispatches `command` and every command the policies emit in response,
    /// breadth first, until no commands are left.
    ///
    /// Returns every event published along the way, in publication order.
    pub fn submit(&mut self, command: C) -> Result<Vec<VersionedEvent<E>>> {
        let mut published = Vec::new();
        self.submit_into(command, &mut published)?;
        Ok(published)
    }

    /// Like [`submit`](Self::submit), but hands each event to `publish` as
    /// soon as it is committed and returns how many there were.
    ///
    /// A failing command stops the loop. Events committed before it have
    /// already reached `publish` and stay recorded in the history; commands
    /// that were emitted but never dispatched are not recorded.
    #[tracing::instrument(skip(self, command, publish), fields(kind = command.kind()))]
    pub fn submit_into<P>(&mut self, command: C, publish: &mut P) -> Result<usize>
    where
        P: Sink<VersionedEvent<E>>,
    {
        let mut queue = VecDeque::from([(command, 0usize)]);
        let mut count = 0;

        while let Some((command, depth)) = queue.pop_front() {
            if depth > self.config.max_cascade_depth {
                tracing::warn!(depth, kind = command.kind(), "cascade limit exceeded");
                return Err(WorkflowError::CascadeLimitExceeded {
                    depth,
                    kind: command.kind(),
                });
            }

            let mut events = Outbox::new();
            self.router.dispatch(&self.store, &command, &mut events)?;
            self.history.record_command(command);

            for event in events {
                let emitted = self.react(&event.payload);
                self.history.record_event(event.payload.clone());

                for next in emitted {
                    tracing::debug!(
                        kind = next.kind(),
                        aggregate_id = %next.aggregate_id(),
                        depth = depth + 1,
                        "policy emitted command"
                    );
                    queue.push_back((next, depth + 1));
                }
                publish.publish(event);
                count += 1;
            }
        }

        Ok(count)
    }

    /// Runs every policy against `event` with the current history.
    fn react(&self, event: &E) -> Vec<C> {
        let mut emitted = Outbox::new();
        for policy in &self.policies {
            let before = emitted.len();
            policy.handle(&self.history, event, &mut emitted);

            let count = emitted.len() - before;
            if count > 0 {
                metrics::counter!("policy_commands_emitted_total", "policy" => policy.name())
                    .increment(count as u64);
            }
        }
        emitted.into_vec()
    }
}

impl<S, C, E> Coordinator<S, C, E>
where
    S: EventStore,
    C: Command + 'static,
    E: FromEnvelope + Clone + 'static,
{
    /// Creates a coordinator whose history holds every event already in
    /// `store`, in append order.
    ///
    /// Commands dispatched by earlier coordinators are not stored, so
    /// policies only see their outcomes.
    pub fn resume(
        store: S,
        router: CommandRouter<C, E>,
        policies: Vec<Box<dyn Policy<E, C>>>,
    ) -> Result<Self> {
        let history = History::from_store(&store).map_err(WorkflowError::History)?;
        tracing::debug!(events = history.len(), "resumed policy history");
        Ok(Self::new(store, router, policies).with_history(history))
    }
}
