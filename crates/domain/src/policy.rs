//! Policies: reactions that turn events into follow-up commands.
//!
//! A policy never touches aggregates or the store. It sees the history of
//! everything that happened so far and the event that just happened, and
//! emits commands into an [`Outbox`]. Dispatching those commands is someone
//! else's job.

use event_store::EventStore;

use crate::aggregate::FromEnvelope;
use crate::error::DomainError;
use crate::sink::Outbox;

/// One entry of a policy's input history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry<E, C> {
    Event(E),
    Command(C),
}

/// Events and commands in the order they happened.
///
/// Commands are recorded alongside events so that a policy can tell whether
/// it (or anyone) already asked for something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<E, C> {
    entries: Vec<HistoryEntry<E, C>>,
}

impl<E, C> History<E, C> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Builds a history containing only events.
    pub fn from_events(events: impl IntoIterator<Item = E>) -> Self {
        Self {
            entries: events.into_iter().map(HistoryEntry::Event).collect(),
        }
    }

    /// Rebuilds the event history from everything `store` holds, in append
    /// order.
    ///
    /// Commands are not stored, so the rebuilt history holds events only.
    pub fn from_store<S>(store: &S) -> Result<Self, DomainError>
    where
        S: EventStore + ?Sized,
        E: FromEnvelope,
    {
        let events = store
            .read_all()?
            .iter()
            .map(E::from_envelope)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_events(events))
    }

    pub fn record_event(&mut self, event: E) {
        self.entries.push(HistoryEntry::Event(event));
    }

    pub fn record_command(&mut self, command: C) {
        self.entries.push(HistoryEntry::Command(command));
    }

    pub fn entries(&self) -> &[HistoryEntry<E, C>] {
        &self.entries
    }

    /// Returns the recorded events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().filter_map(|entry| match entry {
            HistoryEntry::Event(event) => Some(event),
            HistoryEntry::Command(_) => None,
        })
    }

    /// Returns the recorded commands, oldest first.
    pub fn commands(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().filter_map(|entry| match entry {
            HistoryEntry::Command(command) => Some(command),
            HistoryEntry::Event(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E, C> Default for History<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A process manager reacting to events of type `E` with commands of type `C`.
///
/// `handle` must be a pure function of `history` and `trigger`: the same
/// inputs always emit the same commands in the same order. `history` holds
/// what happened before `trigger`, not the trigger itself.
pub trait Policy<E, C>: Send + Sync {
    /// Returns the policy name, used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Reacts to `trigger`, emitting zero or more commands.
    fn handle(&self, history: &History<E, C>, trigger: &E, emit: &mut Outbox<C>);
}

/// Runs a policy once and returns what it emitted.
pub fn run_policy<E, C, P>(policy: &P, history: &History<E, C>, trigger: &E) -> Vec<C>
where
    P: Policy<E, C> + ?Sized,
{
    let mut outbox = Outbox::new();
    policy.handle(history, trigger, &mut outbox);
    outbox.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Bell {
        Rang(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Door {
        Open(u32),
    }

    /// Opens the door on the second ring, once.
    struct Butler;

    impl Policy<Bell, Door> for Butler {
        fn name(&self) -> &'static str {
            "Butler"
        }

        fn handle(&self, history: &History<Bell, Door>, trigger: &Bell, emit: &mut Outbox<Door>) {
            let Bell::Rang(house) = trigger;
            let earlier = history.events().filter(|e| *e == trigger).count();
            let opened = history.commands().any(|c| *c == Door::Open(*house));
            if earlier >= 1 && !opened {
                emit.push(Door::Open(*house));
            }
        }
    }

    #[test]
    fn history_keeps_interleaving() {
        let mut history = History::new();
        history.record_event(Bell::Rang(1));
        history.record_command(Door::Open(1));
        history.record_event(Bell::Rang(2));

        assert_eq!(history.len(), 3);
        assert_eq!(
            history.events().cloned().collect::<Vec<_>>(),
            vec![Bell::Rang(1), Bell::Rang(2)]
        );
        assert_eq!(history.commands().cloned().collect::<Vec<_>>(), vec![Door::Open(1)]);
        assert_eq!(history.entries()[1], HistoryEntry::Command(Door::Open(1)));
    }

    #[test]
    fn run_policy_is_pure() {
        let history = History::from_events(vec![Bell::Rang(7)]);

        let first = run_policy(&Butler, &history, &Bell::Rang(7));
        let second = run_policy(&Butler, &history, &Bell::Rang(7));

        assert_eq!(first, vec![Door::Open(7)]);
        assert_eq!(first, second);
    }

    #[test]
    fn recorded_commands_suppress_repeats() {
        let mut history = History::from_events(vec![Bell::Rang(7)]);
        history.record_command(Door::Open(7));

        assert!(run_policy(&Butler, &history, &Bell::Rang(7)).is_empty());
    }

    #[test]
    fn empty_history_emits_nothing_for_first_ring() {
        let history = History::new();
        assert!(run_policy(&Butler, &history, &Bell::Rang(1)).is_empty());
        assert!(history.is_empty());
    }
}
