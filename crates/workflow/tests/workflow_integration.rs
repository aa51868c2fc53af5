//! Integration tests for the closed command loop.

use std::sync::Once;

use common::AggregateId;
use domain::{
    AddItemToOrder, AggregateRoot, ApplyDiscount, CheckInventory, EatsCommand, EatsEvent,
    Inventory, InventoryEvent, Money, Order, OrderEvent, PlaceOrder, ProductId, ReserveInventory,
    eats,
};
use event_store::{EventStore, InMemoryEventStore, StreamId};
use tracing_subscriber::EnvFilter;
use workflow::{Coordinator, CoordinatorConfig};

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

type EatsCoordinator = Coordinator<InMemoryEventStore, EatsCommand, EatsEvent>;

fn create_coordinator() -> EatsCoordinator {
    init_tracing();
    Coordinator::new(InMemoryEventStore::new(), eats::router(), eats::policies())
        .with_config(CoordinatorConfig::default())
}

fn payloads(published: Vec<domain::VersionedEvent<EatsEvent>>) -> Vec<EatsEvent> {
    published.into_iter().map(|event| event.payload).collect()
}

fn load_order(store: &InMemoryEventStore, id: &str) -> AggregateRoot<Order> {
    let mut root = AggregateRoot::<Order>::new(id);
    root.load_from_envelopes(&store.read(&StreamId::new("Order", id)).unwrap())
        .unwrap();
    root
}

fn load_inventory(store: &InMemoryEventStore, id: &str) -> AggregateRoot<Inventory> {
    let mut root = AggregateRoot::<Inventory>::new(id);
    root.load_from_envelopes(&store.read(&StreamId::new("Inventory", id)).unwrap())
        .unwrap();
    root
}

fn add_item(product: &str, cents: i64) -> EatsCommand {
    AddItemToOrder::new("order-1", product, 1, Money::from_cents(cents)).into()
}

mod closed_loop {
    use super::*;

    #[test]
    fn placing_an_order_checks_inventory() {
        let mut coordinator = create_coordinator();

        let published = coordinator
            .submit(PlaceOrder::new("order-1", "customer-marco-123").into())
            .unwrap();

        assert_eq!(
            payloads(published),
            vec![
                EatsEvent::from(OrderEvent::order_placed("order-1", "customer-marco-123")),
                EatsEvent::from(InventoryEvent::inventory_checked("order-1")),
            ]
        );
        assert_eq!(
            coordinator.history().commands().cloned().collect::<Vec<_>>(),
            vec![
                EatsCommand::from(PlaceOrder::new("order-1", "customer-marco-123")),
                EatsCommand::from(CheckInventory::new("order-1")),
            ]
        );
    }

    #[test]
    fn added_items_are_reserved() {
        let mut coordinator = create_coordinator();
        coordinator
            .submit(PlaceOrder::new("order-1", "customer-marco-123").into())
            .unwrap();

        let published = coordinator.submit(add_item("product-pizza", 1200)).unwrap();

        assert_eq!(
            payloads(published),
            vec![
                EatsEvent::from(OrderEvent::item_added(
                    "order-1",
                    "product-pizza",
                    1,
                    Money::from_cents(1200)
                )),
                EatsEvent::from(InventoryEvent::inventory_reserved(
                    "order-1",
                    "product-pizza",
                    1
                )),
            ]
        );

        let inventory = load_inventory(coordinator.store(), "order-1");
        assert!(inventory.state().is_checked());
        assert_eq!(
            inventory
                .state()
                .reserved_quantity(&ProductId::new("product-pizza")),
            1
        );
    }

    #[test]
    fn third_distinct_product_earns_one_discount() {
        let mut coordinator = create_coordinator();
        coordinator
            .submit(PlaceOrder::new("order-1", "customer-marco-123").into())
            .unwrap();
        coordinator.submit(add_item("product-pizza", 1200)).unwrap();
        coordinator.submit(add_item("product-burger", 900)).unwrap();

        let published = coordinator.submit(add_item("product-salad", 800)).unwrap();

        let kinds: Vec<_> = payloads(published)
            .iter()
            .map(EatsEvent::event_type)
            .collect();
        assert_eq!(
            kinds,
            vec!["ItemAddedToOrder", "InventoryReserved", "DiscountApplied"]
        );

        // A fourth product must not trigger a second discount request
        let published = coordinator.submit(add_item("product-fries", 400)).unwrap();
        let kinds: Vec<_> = payloads(published)
            .iter()
            .map(EatsEvent::event_type)
            .collect();
        assert_eq!(kinds, vec!["ItemAddedToOrder", "InventoryReserved"]);

        let discount_requests = coordinator
            .history()
            .commands()
            .filter(|command| matches!(command, EatsCommand::ApplyDiscount(_)))
            .count();
        assert_eq!(discount_requests, 1);

        let order = load_order(coordinator.store(), "order-1");
        assert_eq!(order.state().discount(), Some(10));
        assert_eq!(order.state().subtotal(), Money::from_cents(3300));
        assert_eq!(order.state().total(), Money::from_cents(2970));
    }

    #[test]
    fn rejected_items_are_not_reserved() {
        let mut coordinator = create_coordinator();
        coordinator
            .submit(PlaceOrder::new("order-1", "customer-marco-123").into())
            .unwrap();

        let published = coordinator
            .submit(
                AddItemToOrder::new("order-1", "product-pizza", 0, Money::from_cents(1200)).into(),
            )
            .unwrap();

        assert_eq!(
            payloads(published),
            vec![EatsEvent::from(OrderEvent::item_cannot_be_added(
                "order-1",
                "product-pizza",
                0,
                "Quantity must be greater than zero"
            ))]
        );
        let inventory = load_inventory(coordinator.store(), "order-1");
        assert_eq!(inventory.state().reserved_products().count(), 0);
    }

    #[test]
    fn items_before_placing_are_rejected_and_not_reserved() {
        let mut coordinator = create_coordinator();

        let published = coordinator.submit(add_item("product-pizza", 1200)).unwrap();

        assert_eq!(published.len(), 1);
        assert_eq!(published[0].payload.event_type(), "ItemCannotBeAdded");
        assert_eq!(coordinator.store().streams().len(), 1);
    }

    #[test]
    fn orders_do_not_share_discount_state() {
        let mut coordinator = create_coordinator();
        for order in ["order-1", "order-2"] {
            coordinator
                .submit(PlaceOrder::new(order, "customer-marco-123").into())
                .unwrap();
        }
        for product in ["product-pizza", "product-burger"] {
            coordinator.submit(add_item(product, 1000)).unwrap();
        }

        let published = coordinator
            .submit(
                AddItemToOrder::new("order-2", "product-salad", 1, Money::from_cents(1000)).into(),
            )
            .unwrap();

        assert!(
            !payloads(published)
                .iter()
                .any(|event| event.event_type() == "DiscountApplied")
        );
        let order = load_order(coordinator.store(), "order-2");
        assert_eq!(order.state().discount(), None);
    }
}

mod direct_commands {
    use super::*;

    #[test]
    fn explicit_discount_is_remembered_by_the_policy() {
        let mut coordinator = create_coordinator();
        coordinator
            .submit(PlaceOrder::new("order-1", "customer-marco-123").into())
            .unwrap();
        coordinator
            .submit(ApplyDiscount::new("order-1", 5).into())
            .unwrap();

        for product in ["product-pizza", "product-burger", "product-salad"] {
            coordinator.submit(add_item(product, 1000)).unwrap();
        }

        let order = load_order(coordinator.store(), "order-1");
        assert_eq!(order.state().discount(), Some(5));
        // The policy saw the earlier ApplyDiscount and stayed quiet
        assert!(
            !coordinator
                .history()
                .events()
                .any(|event| event.event_type() == "DiscountCannotBeApplied")
        );
    }

    #[test]
    fn reservation_without_check_is_rejected() {
        let mut coordinator = create_coordinator();

        let published = coordinator
            .submit(ReserveInventory::new("order-9", "product-pizza", 1).into())
            .unwrap();

        assert_eq!(
            payloads(published),
            vec![EatsEvent::from(InventoryEvent::inventory_cannot_be_reserved(
                "order-9",
                "product-pizza",
                1,
                "Inventory must be checked before reserving"
            ))]
        );
        assert_eq!(
            load_inventory(coordinator.store(), "order-9").id(),
            &AggregateId::new("order-9")
        );
    }
}

mod restart {
    use super::*;

    fn resume(store: &InMemoryEventStore) -> EatsCoordinator {
        init_tracing();
        Coordinator::resume(store.clone(), eats::router(), eats::policies()).unwrap()
    }

    fn place_with_two_items(coordinator: &mut EatsCoordinator) {
        coordinator
            .submit(PlaceOrder::new("order-1", "customer-marco-123").into())
            .unwrap();
        coordinator.submit(add_item("product-pizza", 1200)).unwrap();
        coordinator.submit(add_item("product-burger", 900)).unwrap();
    }

    #[test]
    fn resumed_history_matches_the_original() {
        let mut first = create_coordinator();
        place_with_two_items(&mut first);

        let second = resume(first.store());

        assert_eq!(
            second.history().events().collect::<Vec<_>>(),
            first.history().events().collect::<Vec<_>>()
        );
    }

    #[test]
    fn discount_counts_items_added_before_the_restart() {
        let mut first = create_coordinator();
        place_with_two_items(&mut first);

        let mut second = resume(first.store());
        let published = second.submit(add_item("product-salad", 800)).unwrap();

        let kinds: Vec<_> = payloads(published)
            .iter()
            .map(EatsEvent::event_type)
            .collect();
        assert_eq!(
            kinds,
            vec!["ItemAddedToOrder", "InventoryReserved", "DiscountApplied"]
        );
        let order = load_order(second.store(), "order-1");
        assert_eq!(order.state().discount(), Some(10));
    }

    #[test]
    fn discount_applied_before_the_restart_is_not_requested_again() {
        let mut first = create_coordinator();
        place_with_two_items(&mut first);
        first.submit(add_item("product-salad", 800)).unwrap();

        let mut second = resume(first.store());
        let published = second.submit(add_item("product-fries", 400)).unwrap();

        let kinds: Vec<_> = payloads(published)
            .iter()
            .map(EatsEvent::event_type)
            .collect();
        assert_eq!(kinds, vec!["ItemAddedToOrder", "InventoryReserved"]);
    }
}
