//! Order commands.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::command::{Command, require};

use super::{CustomerId, Money, ProductId};

/// Command to place a new order for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub order_id: AggregateId,
    pub customer_id: CustomerId,
}

impl PlaceOrder {
    pub const KIND: &'static str = "PlaceOrder";

    pub fn new(order_id: impl Into<AggregateId>, customer_id: impl Into<CustomerId>) -> Self {
        Self {
            order_id: order_id.into(),
            customer_id: customer_id.into(),
        }
    }
}

impl Command for PlaceOrder {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.order_id
    }

    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require(&mut violations, "AggregateId", self.order_id.as_str());
        require(&mut violations, "CustomerId", self.customer_id.as_str());
        violations
    }
}

/// Command to add a product to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItemToOrder {
    pub order_id: AggregateId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Money,
}

impl AddItemToOrder {
    pub const KIND: &'static str = "AddItemToOrder";

    pub fn new(
        order_id: impl Into<AggregateId>,
        product_id: impl Into<ProductId>,
        quantity: i32,
        price: Money,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            product_id: product_id.into(),
            quantity,
            price,
        }
    }
}

impl Command for AddItemToOrder {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.order_id
    }

    // Quantity is a business rule, enforced by the order itself.
    fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        require(&mut violations, "AggregateId", self.order_id.as_str());
        require(&mut violations, "ProductId", self.product_id.as_str());
        violations
    }
}

/// Command to apply a percentage discount to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyDiscount {
    pub order_id: AggregateId,
    pub percentage: u32,
}

impl ApplyDiscount {
    pub const KIND: &'static str = "ApplyDiscount";

    pub fn new(order_id: impl Into<AggregateId>, percentage: u32) -> Self {
        Self {
            order_id: order_id.into(),
            percentage,
        }
    }
}

impl Command for ApplyDiscount {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn aggregate_id(&self) -> &AggregateId {
        &self.order_id
    }
}
