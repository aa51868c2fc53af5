//! Inventory domain events.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;
use crate::order::ProductId;

/// Events that can occur on an inventory aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InventoryEvent {
    /// Stock was checked for the order.
    InventoryChecked(InventoryCheckedData),

    /// Stock was set aside for one order line.
    InventoryReserved(ReservedData),

    /// A reservation was rejected.
    InventoryCannotBeReserved(ReservationRejectedData),
}

impl DomainEvent for InventoryEvent {
    const EVENT_TYPES: &'static [&'static str] = &[
        "InventoryChecked",
        "InventoryReserved",
        "InventoryCannotBeReserved",
    ];

    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::InventoryChecked(_) => "InventoryChecked",
            InventoryEvent::InventoryReserved(_) => "InventoryReserved",
            InventoryEvent::InventoryCannotBeReserved(_) => "InventoryCannotBeReserved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCheckedData {
    pub order_id: AggregateId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedData {
    pub order_id: AggregateId,
    pub product_id: ProductId,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRejectedData {
    pub order_id: AggregateId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub reason: String,
}

impl InventoryEvent {
    pub fn inventory_checked(order_id: impl Into<AggregateId>) -> Self {
        InventoryEvent::InventoryChecked(InventoryCheckedData {
            order_id: order_id.into(),
        })
    }

    pub fn inventory_reserved(
        order_id: impl Into<AggregateId>,
        product_id: impl Into<ProductId>,
        quantity: i32,
    ) -> Self {
        InventoryEvent::InventoryReserved(ReservedData {
            order_id: order_id.into(),
            product_id: product_id.into(),
            quantity,
        })
    }

    pub fn inventory_cannot_be_reserved(
        order_id: impl Into<AggregateId>,
        product_id: impl Into<ProductId>,
        quantity: i32,
        reason: impl Into<String>,
    ) -> Self {
        InventoryEvent::InventoryCannotBeReserved(ReservationRejectedData {
            order_id: order_id.into(),
            product_id: product_id.into(),
            quantity,
            reason: reason.into(),
        })
    }

    /// Returns the order this event belongs to.
    pub fn order_id(&self) -> &AggregateId {
        match self {
            InventoryEvent::InventoryChecked(data) => &data.order_id,
            InventoryEvent::InventoryReserved(data) => &data.order_id,
            InventoryEvent::InventoryCannotBeReserved(data) => &data.order_id,
        }
    }
}
