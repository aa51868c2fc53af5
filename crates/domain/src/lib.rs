//! Domain layer for the event-sourcing system.
//!
//! This crate provides the kernel of the system:
//! - [`Aggregate`] and [`AggregateRoot`] for event-sourced state
//! - [`CommandRouter`] for executing commands against aggregates
//! - [`Policy`] for turning events into follow-up commands
//!
//! and an example ordering system built on it: the [`order`] and
//! [`inventory`] aggregates, wired together in [`eats`].

pub mod aggregate;
pub mod command;
pub mod config;
pub mod eats;
pub mod error;
pub mod inventory;
pub mod order;
pub mod policy;
pub mod sink;

pub use aggregate::{Aggregate, AggregateRoot, DomainEvent, FromEnvelope, VersionedEvent};
pub use command::{Command, CommandRouter, Dispatched};
pub use config::RouterConfig;
pub use eats::{EatsCommand, EatsEvent};
pub use error::DomainError;
pub use inventory::{CheckInventory, Inventory, InventoryEvent, ReserveInventory};
pub use order::{
    AddItemToOrder, ApplyDiscount, CustomerId, DiscountPolicy, InventoryCheckPolicy, Money, Order,
    OrderEvent, OrderLine, OrderStatus, PlaceOrder, ProductId,
};
pub use policy::{History, HistoryEntry, Policy, run_policy};
pub use sink::{Outbox, Sink};
