//! Order domain events.
//!
//! Rejected requests are facts too: when a command is not allowed the order
//! records a `...CannotBe...` event carrying the reason instead of failing.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{CustomerId, Money, ProductId};

/// Events that can occur on an order aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was placed by a customer.
    OrderPlaced(OrderPlacedData),

    /// A second attempt to place the order was rejected.
    OrderCannotBePlaced(OrderRejectedData),

    /// Item was added to the order.
    ItemAddedToOrder(ItemAddedData),

    /// Adding an item was rejected.
    ItemCannotBeAdded(ItemRejectedData),

    /// A percentage discount was applied to the order.
    DiscountApplied(DiscountAppliedData),

    /// Applying a discount was rejected.
    DiscountCannotBeApplied(DiscountRejectedData),
}

impl DomainEvent for OrderEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "OrderPlaced",
        "OrderCannotBePlaced",
        "ItemAddedToOrder",
        "ItemCannotBeAdded",
        "DiscountApplied",
        "DiscountCannotBeApplied",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "OrderPlaced",
            OrderEvent::OrderCannotBePlaced(_) => "OrderCannotBePlaced",
            OrderEvent::ItemAddedToOrder(_) => "ItemAddedToOrder",
            OrderEvent::ItemCannotBeAdded(_) => "ItemCannotBeAdded",
            OrderEvent::DiscountApplied(_) => "DiscountApplied",
            OrderEvent::DiscountCannotBeApplied(_) => "DiscountCannotBeApplied",
        }
    }
}

/// Data for OrderPlaced event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacedData {
    pub order_id: AggregateId,
    pub customer_id: CustomerId,
}

/// Data for OrderCannotBePlaced event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRejectedData {
    pub order_id: AggregateId,
    pub customer_id: CustomerId,
    pub reason: String,
}

/// Data for ItemAddedToOrder event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    pub order_id: AggregateId,

    /// The product that was added.
    pub product_id: ProductId,

    /// Quantity added.
    pub quantity: i32,

    /// Unit price at the time of adding.
    pub price: Money,
}

/// Data for ItemCannotBeAdded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRejectedData {
    pub order_id: AggregateId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub reason: String,
}

/// Data for DiscountApplied event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountAppliedData {
    pub order_id: AggregateId,
    pub percentage: u32,
}

/// Data for DiscountCannotBeApplied event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRejectedData {
    pub order_id: AggregateId,
    pub percentage: u32,
    pub reason: String,
}

// Convenience constructors for events
impl OrderEvent {
    /// Creates an OrderPlaced event.
    pub fn order_placed(
        order_id: impl Into<AggregateId>,
        customer_id: impl Into<CustomerId>,
    ) -> Self {
        OrderEvent::OrderPlaced(OrderPlacedData {
            order_id: order_id.into(),
            customer_id: customer_id.into(),
        })
    }

    /// Creates an OrderCannotBePlaced event.
    pub fn order_cannot_be_placed(
        order_id: impl Into<AggregateId>,
        customer_id: impl Into<CustomerId>,
        reason: impl Into<String>,
    ) -> Self {
        OrderEvent::OrderCannotBePlaced(OrderRejectedData {
            order_id: order_id.into(),
            customer_id: customer_id.into(),
            reason: reason.into(),
        })
    }

    /// Creates an ItemAddedToOrder event.
    pub fn item_added(
        order_id: impl Into<AggregateId>,
        product_id: impl Into<ProductId>,
        quantity: i32,
        price: Money,
    ) -> Self {
        OrderEvent::ItemAddedToOrder(ItemAddedData {
            order_id: order_id.into(),
            product_id: product_id.into(),
            quantity,
            price,
        })
    }

    /// Creates an ItemCannotBeAdded event.
    pub fn item_cannot_be_added(
        order_id: impl Into<AggregateId>,
        product_id: impl Into<ProductId>,
        quantity: i32,
        reason: impl Into<String>,
    ) -> Self {
        OrderEvent::ItemCannotBeAdded(ItemRejectedData {
            order_id: order_id.into(),
            product_id: product_id.into(),
            quantity,
            reason: reason.into(),
        })
    }

    /// Creates a DiscountApplied event.
    pub fn discount_applied(order_id: impl Into<AggregateId>, percentage: u32) -> Self {
        OrderEvent::DiscountApplied(DiscountAppliedData {
            order_id: order_id.into(),
            percentage,
        })
    }

    /// Creates a DiscountCannotBeApplied event.
    pub fn discount_cannot_be_applied(
        order_id: impl Into<AggregateId>,
        percentage: u32,
        reason: impl Into<String>,
    ) -> Self {
        OrderEvent::DiscountCannotBeApplied(DiscountRejectedData {
            order_id: order_id.into(),
            percentage,
            reason: reason.into(),
        })
    }

    /// Returns the order this event belongs to.
    pub fn order_id(&self) -> &AggregateId {
        match self {
            OrderEvent::OrderPlaced(data) => &data.order_id,
            OrderEvent::OrderCannotBePlaced(data) => &data.order_id,
            OrderEvent::ItemAddedToOrder(data) => &data.order_id,
            OrderEvent::ItemCannotBeAdded(data) => &data.order_id,
            OrderEvent::DiscountApplied(data) => &data.order_id,
            OrderEvent::DiscountCannotBeApplied(data) => &data.order_id,
        }
    }

    /// Returns the rejection reason for `...CannotBe...` events.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            OrderEvent::OrderCannotBePlaced(data) => Some(&data.reason),
            OrderEvent::ItemCannotBeAdded(data) => Some(&data.reason),
            OrderEvent::DiscountCannotBeApplied(data) => Some(&data.reason),
            OrderEvent::OrderPlaced(_)
            | OrderEvent::ItemAddedToOrder(_)
            | OrderEvent::DiscountApplied(_) => None,
        }
    }
}
