//! Order aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod policies;
mod state;
mod value_objects;

pub use aggregate::Order;
pub use commands::{AddItemToOrder, ApplyDiscount, PlaceOrder};
pub use events::{
    DiscountAppliedData, DiscountRejectedData, ItemAddedData, ItemRejectedData, OrderEvent,
    OrderPlacedData, OrderRejectedData,
};
pub use policies::{DiscountPolicy, InventoryCheckPolicy};
pub use state::OrderStatus;
pub use value_objects::{CustomerId, Money, OrderLine, ProductId};

/// Reasons recorded on order rejection events.
pub mod reasons {
    pub const ORDER_ALREADY_PLACED: &str = "Order has already been placed";
    pub const ITEM_ORDER_NOT_PLACED: &str = "Order must be placed before adding items";
    pub const ITEM_QUANTITY_NOT_POSITIVE: &str = "Quantity must be greater than zero";
    pub const DISCOUNT_ORDER_NOT_PLACED: &str = "Order must be placed before applying a discount";
    pub const DISCOUNT_ALREADY_APPLIED: &str = "Discount has already been applied";
    pub const DISCOUNT_OUT_OF_RANGE: &str = "Discount percentage must be between 1 and 100";
}
