//! Order aggregate implementation.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;

use super::{
    CustomerId, Money, OrderEvent, OrderLine, OrderStatus, ProductId, reasons,
    events::{DiscountAppliedData, ItemAddedData, OrderPlacedData},
};

/// Order aggregate state.
///
/// Built purely from events. Rejection events leave it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Set by OrderPlaced.
    id: Option<AggregateId>,

    /// Customer who placed the order.
    customer_id: Option<CustomerId>,

    status: OrderStatus,

    /// Lines in the order they were added. The same product may appear twice.
    lines: Vec<OrderLine>,

    /// Applied discount percentage.
    discount: Option<u32>,
}

impl Aggregate for Order {
    type Event = OrderEvent;

    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::OrderPlaced(data) => self.apply_order_placed(data),
            OrderEvent::ItemAddedToOrder(data) => self.apply_item_added(data),
            OrderEvent::DiscountApplied(data) => self.apply_discount_applied(data),
            OrderEvent::OrderCannotBePlaced(_)
            | OrderEvent::ItemCannotBeAdded(_)
            | OrderEvent::DiscountCannotBeApplied(_) => {}
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> Option<&AggregateId> {
        self.id.as_ref()
    }

    /// Returns the customer ID.
    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_placed(&self) -> bool {
        self.status == OrderStatus::Placed
    }

    /// Returns all lines in the order they were added.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Returns the total quantity ordered of a product across all lines.
    pub fn quantity_of(&self, product_id: &ProductId) -> i32 {
        self.lines
            .iter()
            .filter(|line| &line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }

    /// Returns the number of different products in the order.
    pub fn distinct_products(&self) -> usize {
        let mut products: Vec<_> = self.lines.iter().map(|line| &line.product_id).collect();
        products.sort();
        products.dedup();
        products.len()
    }

    /// Returns the applied discount percentage, if any.
    pub fn discount(&self) -> Option<u32> {
        self.discount
    }

    /// Returns the sum of all line totals before any discount.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(OrderLine::total_price).sum()
    }

    /// Returns the subtotal with the discount taken off.
    pub fn total(&self) -> Money {
        match self.discount {
            Some(percentage) => self.subtotal().percent_off(percentage),
            None => self.subtotal(),
        }
    }
}

// Command methods (return events)
impl Order {
    /// Places the order for a customer.
    pub fn place(&self, order_id: &AggregateId, customer_id: &CustomerId) -> Vec<OrderEvent> {
        if !self.status.can_place() {
            return vec![OrderEvent::order_cannot_be_placed(
                order_id.clone(),
                customer_id.clone(),
                reasons::ORDER_ALREADY_PLACED,
            )];
        }

        vec![OrderEvent::order_placed(order_id.clone(), customer_id.clone())]
    }

    /// Adds a product line to the order.
    pub fn add_item(
        &self,
        order_id: &AggregateId,
        product_id: &ProductId,
        quantity: i32,
        price: Money,
    ) -> Vec<OrderEvent> {
        let rejection = if !self.status.can_add_items() {
            Some(reasons::ITEM_ORDER_NOT_PLACED)
        } else if quantity <= 0 {
            Some(reasons::ITEM_QUANTITY_NOT_POSITIVE)
        } else {
            None
        };

        match rejection {
            Some(reason) => vec![OrderEvent::item_cannot_be_added(
                order_id.clone(),
                product_id.clone(),
                quantity,
                reason,
            )],
            None => vec![OrderEvent::item_added(
                order_id.clone(),
                product_id.clone(),
                quantity,
                price,
            )],
        }
    }

    /// Applies a percentage discount. An order takes at most one discount.
    pub fn apply_discount(&self, order_id: &AggregateId, percentage: u32) -> Vec<OrderEvent> {
        let rejection = if !self.status.can_apply_discount() {
            Some(reasons::DISCOUNT_ORDER_NOT_PLACED)
        } else if self.discount.is_some() {
            Some(reasons::DISCOUNT_ALREADY_APPLIED)
        } else if !(1..=100).contains(&percentage) {
            Some(reasons::DISCOUNT_OUT_OF_RANGE)
        } else {
            None
        };

        match rejection {
            Some(reason) => vec![OrderEvent::discount_cannot_be_applied(
                order_id.clone(),
                percentage,
                reason,
            )],
            None => vec![OrderEvent::discount_applied(order_id.clone(), percentage)],
        }
    }
}

// Event application (private)
impl Order {
    fn apply_order_placed(&mut self, data: &OrderPlacedData) {
        self.id = Some(data.order_id.clone());
        self.customer_id = Some(data.customer_id.clone());
        self.status = OrderStatus::Placed;
    }

    fn apply_item_added(&mut self, data: &ItemAddedData) {
        self.lines.push(OrderLine::new(
            data.product_id.clone(),
            data.quantity,
            data.price,
        ));
    }

    fn apply_discount_applied(&mut self, data: &DiscountAppliedData) {
        self.discount = Some(data.percentage);
    }
}
