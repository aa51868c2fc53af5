//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Where an order is in its lifecycle.
///
/// ```text
/// Unplaced ──OrderPlaced──► Placed
/// ```
///
/// Every request other than placing requires a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// No OrderPlaced event has been applied yet.
    #[default]
    Unplaced,

    /// The order was placed and accepts items and a discount.
    Placed,
}

impl OrderStatus {
    /// Returns true if the order can be placed in this status.
    pub fn can_place(&self) -> bool {
        matches!(self, OrderStatus::Unplaced)
    }

    /// Returns true if items can be added in this status.
    pub fn can_add_items(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    /// Returns true if a discount can be applied in this status.
    pub fn can_apply_discount(&self) -> bool {
        matches!(self, OrderStatus::Placed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unplaced => "Unplaced",
            OrderStatus::Placed => "Placed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_status_is_unplaced() {
        assert_eq!(OrderStatus::default(), OrderStatus::Unplaced);
    }

    #[test]
    fn test_only_unplaced_can_be_placed() {
        assert!(OrderStatus::Unplaced.can_place());
        assert!(!OrderStatus::Placed.can_place());
    }

    #[test]
    fn test_placed_accepts_items_and_discounts() {
        assert!(OrderStatus::Placed.can_add_items());
        assert!(OrderStatus::Placed.can_apply_discount());
        assert!(!OrderStatus::Unplaced.can_add_items());
        assert!(!OrderStatus::Unplaced.can_apply_discount());
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderStatus::Placed.to_string(), "Placed");
    }
}
