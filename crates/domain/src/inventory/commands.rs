//! Inventory commands.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::command::{Command, require};
use crate::order::ProductId;

/// Command to check stock for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInventory {
    pub order_id: AggregateId,
}

impl CheckInventory {
    pub const KIND: &'static str = "CheckInventory";

    pub fn new(order_id: impl Into<AggregateId>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}

impl Command for CheckInventory {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.order_id
    }
}

/// Command to reserve stock for one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveInventory {
    pub order_id: AggregateId,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl ReserveInventory {
    pub const KIND: &'static str = "ReserveInventory";

    pub fn new(
        order_id: impl Into<AggregateId>,
        product_id: impl Into<ProductId>,
        quantity: i32,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            product_id: product_id.into(),
            quantity,
        }
    }
}

impl Command for ReserveInventory {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.order_id
    }

    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require(&mut violations, "AggregateId", self.order_id.as_str());
        require(&mut violations, "ProductId", self.product_id.as_str());
        violations
    }
}
