//! Destinations for published events and emitted commands.

use std::sync::mpsc;

/// Anything that accepts items in order.
///
/// The command router publishes committed events into a sink, and policies
/// emit commands into an [`Outbox`]. Publishing cannot fail: a sink that
/// drops items (a disconnected channel) does so silently.
pub trait Sink<T> {
    /// Accepts one item.
    fn publish(&mut self, item: T);
}

/// An ordered buffer of items waiting to be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbox<T> {
    items: Vec<T>,
}

impl<T> Outbox<T> {
    /// Creates an empty outbox.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Returns the buffered items in insertion order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes and yields every buffered item in insertion order.
    pub fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.items.drain(..)
    }

    /// Consumes the outbox, returning its items.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Outbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Outbox<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> Sink<T> for Outbox<T> {
    fn publish(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Sink<T> for Vec<T> {
    fn publish(&mut self, item: T) {
        self.push(item);
    }
}

impl<T> Sink<T> for mpsc::Sender<T> {
    fn publish(&mut self, item: T) {
        if self.send(item).is_err() {
            tracing::debug!("sink receiver dropped, discarding item");
        }
    }
}
