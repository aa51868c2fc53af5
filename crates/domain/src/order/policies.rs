//! Policies reacting to order events.

use std::collections::BTreeSet;

use crate::eats::{EatsCommand, EatsEvent};
use crate::inventory::{CheckInventory, ReserveInventory};
use crate::policy::{History, Policy};
use crate::sink::Outbox;

use super::{ApplyDiscount, OrderEvent, ProductId};

/// Checks stock when an order is placed and reserves it for every added line.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryCheckPolicy;

impl Policy<EatsEvent, EatsCommand> for InventoryCheckPolicy {
    fn name(&self) -> &'static str {
        "InventoryCheckPolicy"
    }

    fn handle(
        &self,
        _history: &History<EatsEvent, EatsCommand>,
        trigger: &EatsEvent,
        emit: &mut Outbox<EatsCommand>,
    ) {
        match trigger {
            EatsEvent::Order(OrderEvent::OrderPlaced(data)) => {
                emit.push(CheckInventory::new(data.order_id.clone()).into());
            }
            EatsEvent::Order(OrderEvent::ItemAddedToOrder(data)) => {
                emit.push(
                    ReserveInventory::new(
                        data.order_id.clone(),
                        data.product_id.clone(),
                        data.quantity,
                    )
                    .into(),
                );
            }
            _ => {}
        }
    }
}

/// Rewards orders with enough different products with a one-time discount.
#[derive(Debug, Clone, Copy)]
pub struct DiscountPolicy {
    /// Distinct products an order needs before the discount is granted.
    pub threshold: usize,

    /// Percentage taken off.
    pub percentage: u32,
}

impl DiscountPolicy {
    pub fn new(threshold: usize, percentage: u32) -> Self {
        Self {
            threshold,
            percentage,
        }
    }
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        Self::new(3, 10)
    }
}

impl Policy<EatsEvent, EatsCommand> for DiscountPolicy {
    fn name(&self) -> &'static str {
        "DiscountPolicy"
    }

    fn handle(
        &self,
        history: &History<EatsEvent, EatsCommand>,
        trigger: &EatsEvent,
        emit: &mut Outbox<EatsCommand>,
    ) {
        let EatsEvent::Order(OrderEvent::ItemAddedToOrder(added)) = trigger else {
            return;
        };
        let order_id = &added.order_id;

        // A history rebuilt from the store has no commands, only the outcome.
        let already_requested = history.commands().any(|command| {
            matches!(command, EatsCommand::ApplyDiscount(c) if &c.order_id == order_id)
        });
        let already_applied = history.events().any(|event| {
            matches!(
                event,
                EatsEvent::Order(OrderEvent::DiscountApplied(data)) if &data.order_id == order_id
            )
        });
        if already_requested || already_applied {
            return;
        }

        let mut products: BTreeSet<&ProductId> = history
            .events()
            .filter_map(|event| match event {
                EatsEvent::Order(OrderEvent::ItemAddedToOrder(data))
                    if &data.order_id == order_id =>
                {
                    Some(&data.product_id)
                }
                _ => None,
            })
            .collect();
        products.insert(&added.product_id);

        if products.len() >= self.threshold {
            emit.push(ApplyDiscount::new(order_id.clone(), self.percentage).into());
        }
    }
}
