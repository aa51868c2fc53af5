//! The ordering system as a whole: every command and event it knows about,
//! the routes that connect them and the policies that react to them.

use common::AggregateId;
use event_store::EventEnvelope;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, FromEnvelope, VersionedEvent};
use crate::command::{Command, CommandRouter};
use crate::config::RouterConfig;
use crate::inventory::{CheckInventory, Inventory, InventoryEvent, ReserveInventory};
use crate::order::{
    AddItemToOrder, ApplyDiscount, DiscountPolicy, InventoryCheckPolicy, Order, OrderEvent,
    PlaceOrder,
};
use crate::error::DomainError;
use crate::policy::Policy;

/// Any event raised by an aggregate of the ordering system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EatsEvent {
    Order(OrderEvent),
    Inventory(InventoryEvent),
}

impl EatsEvent {
    pub fn event_type(&self) -> &'static str {
        use crate::aggregate::DomainEvent;

        match self {
            EatsEvent::Order(event) => event.event_type(),
            EatsEvent::Inventory(event) => event.event_type(),
        }
    }

    /// Returns the order the event concerns.
    pub fn order_id(&self) -> &AggregateId {
        match self {
            EatsEvent::Order(event) => event.order_id(),
            EatsEvent::Inventory(event) => event.order_id(),
        }
    }
}

impl FromEnvelope for EatsEvent {
    fn from_envelope(envelope: &EventEnvelope) -> Result<Self, DomainError> {
        let aggregate_type = envelope.aggregate_type.as_str();
        if aggregate_type == Order::aggregate_type() {
            let event = VersionedEvent::<OrderEvent>::from_envelope(aggregate_type, envelope)?;
            Ok(event.payload.into())
        } else if aggregate_type == Inventory::aggregate_type() {
            let event = VersionedEvent::<InventoryEvent>::from_envelope(aggregate_type, envelope)?;
            Ok(event.payload.into())
        } else {
            Err(DomainError::UnhandledEventKind {
                aggregate_type: aggregate_type.to_string(),
                event_type: envelope.event_type.clone(),
            })
        }
    }
}

impl From<OrderEvent> for EatsEvent {
    fn from(event: OrderEvent) -> Self {
        EatsEvent::Order(event)
    }
}

impl From<InventoryEvent> for EatsEvent {
    fn from(event: InventoryEvent) -> Self {
        EatsEvent::Inventory(event)
    }
}

/// Any command the ordering system accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EatsCommand {
    PlaceOrder(PlaceOrder),
    AddItemToOrder(AddItemToOrder),
    ApplyDiscount(ApplyDiscount),
    CheckInventory(CheckInventory),
    ReserveInventory(ReserveInventory),
}

impl EatsCommand {
    fn inner(&self) -> &dyn Command {
        match self {
            EatsCommand::PlaceOrder(command) => command,
            EatsCommand::AddItemToOrder(command) => command,
            EatsCommand::ApplyDiscount(command) => command,
            EatsCommand::CheckInventory(command) => command,
            EatsCommand::ReserveInventory(command) => command,
        }
    }
}

impl Command for EatsCommand {
    fn kind(&self) -> &'static str {
        self.inner().kind()
    }

    fn aggregate_id(&self) -> &AggregateId {
        self.inner().aggregate_id()
    }

    fn validate(&self) -> Vec<String> {
        self.inner().validate()
    }
}

macro_rules! impl_from_command {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for EatsCommand {
                fn from(command: $variant) -> Self {
                    EatsCommand::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    PlaceOrder,
    AddItemToOrder,
    ApplyDiscount,
    CheckInventory,
    ReserveInventory,
);

/// Builds the router for every command kind of the ordering system.
pub fn router() -> CommandRouter<EatsCommand, EatsEvent> {
    router_with_config(RouterConfig::default())
}

pub fn router_with_config(config: RouterConfig) -> CommandRouter<EatsCommand, EatsEvent> {
    CommandRouter::with_config(config)
        .route::<Order, _>(PlaceOrder::KIND, |order, command| match command {
            EatsCommand::PlaceOrder(c) => Some(order.place(&c.order_id, &c.customer_id)),
            _ => None,
        })
        .route::<Order, _>(AddItemToOrder::KIND, |order, command| match command {
            EatsCommand::AddItemToOrder(c) => {
                Some(order.add_item(&c.order_id, &c.product_id, c.quantity, c.price))
            }
            _ => None,
        })
        .route::<Order, _>(ApplyDiscount::KIND, |order, command| match command {
            EatsCommand::ApplyDiscount(c) => Some(order.apply_discount(&c.order_id, c.percentage)),
            _ => None,
        })
        .route::<Inventory, _>(CheckInventory::KIND, |inventory, command| match command {
            EatsCommand::CheckInventory(c) => Some(inventory.check(&c.order_id)),
            _ => None,
        })
        .route::<Inventory, _>(ReserveInventory::KIND, |inventory, command| {
            match command {
                EatsCommand::ReserveInventory(c) => {
                    Some(inventory.reserve(&c.order_id, &c.product_id, c.quantity))
                }
                _ => None,
            }
        })
}

/// Returns every policy of the ordering system.
pub fn policies() -> Vec<Box<dyn Policy<EatsEvent, EatsCommand>>> {
    vec![
        Box::new(InventoryCheckPolicy),
        Box::new(DiscountPolicy::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Money;
    use crate::policy::History;
    use event_store::{EventStore, InMemoryEventStore, StreamId, Version};

    #[test]
    fn every_command_kind_is_routed() {
        let router = router();
        let commands: Vec<EatsCommand> = vec![
            PlaceOrder::new("order-1", "cust-A").into(),
            AddItemToOrder::new("order-1", "sku-7", 1, Money::zero()).into(),
            ApplyDiscount::new("order-1", 10).into(),
            CheckInventory::new("order-1").into(),
            ReserveInventory::new("order-1", "sku-7", 1).into(),
        ];

        for command in &commands {
            assert!(router.is_routed(command.kind()), "{} is not routed", command.kind());
        }
        assert_eq!(router.aggregate_type_for("PlaceOrder"), Some("Order"));
        assert_eq!(router.aggregate_type_for("ReserveInventory"), Some("Inventory"));
    }

    #[test]
    fn command_delegates_to_inner() {
        let command: EatsCommand = PlaceOrder::new("order-1", "").into();
        assert_eq!(command.kind(), "PlaceOrder");
        assert_eq!(command.aggregate_id().as_str(), "order-1");
        assert_eq!(command.validate(), vec!["CustomerId is required"]);
    }

    #[test]
    fn events_wrap_by_aggregate() {
        let event: EatsEvent = OrderEvent::order_placed("order-1", "cust-A").into();
        assert_eq!(event.event_type(), "OrderPlaced");
        assert_eq!(event.order_id().as_str(), "order-1");

        let event: EatsEvent = InventoryEvent::inventory_checked("order-1").into();
        assert_eq!(event.event_type(), "InventoryChecked");
    }

    #[test]
    fn history_is_rebuilt_from_every_stream_in_append_order() {
        let store = InMemoryEventStore::new();
        let router = router();
        let commands: Vec<EatsCommand> = vec![
            PlaceOrder::new("order-1", "cust-A").into(),
            CheckInventory::new("order-1").into(),
            AddItemToOrder::new("order-1", "sku-7", 1, Money::from_cents(500)).into(),
        ];
        for command in &commands {
            router.dispatch(&store, command, &mut Vec::new()).unwrap();
        }

        let history = History::<EatsEvent, EatsCommand>::from_store(&store).unwrap();

        let kinds: Vec<_> = history.events().map(EatsEvent::event_type).collect();
        assert_eq!(kinds, vec!["OrderPlaced", "InventoryChecked", "ItemAddedToOrder"]);
        assert_eq!(history.commands().count(), 0);
    }

    #[test]
    fn history_rejects_streams_of_unknown_aggregates() {
        let store = InMemoryEventStore::new();
        let stream = StreamId::new("Courier", "courier-1");
        store
            .append(
                &stream,
                Version::initial(),
                vec![EventEnvelope::new(
                    &stream,
                    Version::first(),
                    "CourierAssigned",
                    serde_json::json!({}),
                )],
            )
            .unwrap();

        let result = History::<EatsEvent, EatsCommand>::from_store(&store);

        match result {
            Err(DomainError::UnhandledEventKind {
                aggregate_type,
                event_type,
            }) => {
                assert_eq!(aggregate_type, "Courier");
                assert_eq!(event_type, "CourierAssigned");
            }
            other => panic!("expected UnhandledEventKind, got {other:?}"),
        }
    }
}
