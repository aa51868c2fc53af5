//! Inventory aggregate implementation.

use std::collections::BTreeMap;

use common::AggregateId;

use crate::aggregate::Aggregate;
use crate::order::ProductId;

use super::{InventoryEvent, reasons};

/// Stock held for one order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    checked: bool,

    /// Reserved quantity per product.
    reserved: BTreeMap<ProductId, i32>,
}

impl Aggregate for Inventory {
    type Event = InventoryEvent;

    fn aggregate_type() -> &'static str {
        "Inventory"
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::InventoryChecked(_) => self.checked = true,
            InventoryEvent::InventoryReserved(data) => {
                *self.reserved.entry(data.product_id.clone()).or_default() += data.quantity;
            }
            InventoryEvent::InventoryCannotBeReserved(_) => {}
        }
    }
}

// Query methods
impl Inventory {
    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Returns the quantity reserved for a product.
    pub fn reserved_quantity(&self, product_id: &ProductId) -> i32 {
        self.reserved.get(product_id).copied().unwrap_or(0)
    }

    /// Returns every product with a reservation.
    pub fn reserved_products(&self) -> impl Iterator<Item = (&ProductId, i32)> {
        self.reserved.iter().map(|(product, quantity)| (product, *quantity))
    }
}

// Command methods (return events)
impl Inventory {
    /// Checks stock for the order. Checking twice changes nothing.
    pub fn check(&self, order_id: &AggregateId) -> Vec<InventoryEvent> {
        if self.checked {
            return vec![];
        }

        vec![InventoryEvent::inventory_checked(order_id.clone())]
    }

    /// Reserves stock for one order line.
    pub fn reserve(
        &self,
        order_id: &AggregateId,
        product_id: &ProductId,
        quantity: i32,
    ) -> Vec<InventoryEvent> {
        let rejection = if !self.checked {
            Some(reasons::NOT_CHECKED)
        } else if quantity <= 0 {
            Some(reasons::QUANTITY_NOT_POSITIVE)
        } else {
            None
        };

        match rejection {
            Some(reason) => vec![InventoryEvent::inventory_cannot_be_reserved(
                order_id.clone(),
                product_id.clone(),
                quantity,
                reason,
            )],
            None => vec![InventoryEvent::inventory_reserved(
                order_id.clone(),
                product_id.clone(),
                quantity,
            )],
        }
    }
}
