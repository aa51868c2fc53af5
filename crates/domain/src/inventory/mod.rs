//! Inventory aggregate: stock checks and reservations made on behalf of an order.
//!
//! One inventory stream exists per order, keyed by the order ID.

mod aggregate;
mod commands;
mod events;

pub use aggregate::Inventory;
pub use commands::{CheckInventory, ReserveInventory};
pub use events::{
    InventoryCheckedData, InventoryEvent, ReservationRejectedData, ReservedData,
};

/// Reasons recorded on inventory rejection events.
pub mod reasons {
    pub const NOT_CHECKED: &str = "Inventory must be checked before reserving";
    pub const QUANTITY_NOT_POSITIVE: &str = "Quantity must be greater than zero";
}
