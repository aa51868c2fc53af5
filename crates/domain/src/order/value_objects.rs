//! Value objects for the order domain.

use serde::{Deserialize, Serialize};

/// Identifier of the customer who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a customer ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the customer ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Product identifier (SKU).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 999 = $9.99)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Multiplies by a quantity, saturating at the representable range.
    pub fn times(&self, quantity: i32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }

    /// Takes `percentage` percent off, rounding the discount down to the cent.
    pub fn percent_off(&self, percentage: u32) -> Money {
        // Never larger in magnitude than `cents`, so it fits back into i64.
        let discount = i128::from(self.cents) * i128::from(percentage.min(100)) / 100;
        Money {
            cents: self.cents - discount as i64,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |total, money| total + money)
    }
}

/// One line of an order: a product, how many, and the unit price at the time
/// it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn new(product_id: impl Into<ProductId>, quantity: i32, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_string_conversion() {
        let product: ProductId = "sku-7".into();
        assert_eq!(product.as_str(), "sku-7");

        let customer = CustomerId::new("cust-A");
        assert_eq!(customer.to_string(), "cust-A");
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(999).to_string(), "$9.99");
        assert_eq!(Money::from_cents(100).to_string(), "$1.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1000);
        assert_eq!((a + Money::from_cents(500)).cents(), 1500);
        assert_eq!(a.times(3).cents(), 3000);
        assert_eq!(
            vec![a, a, Money::from_cents(1)].into_iter().sum::<Money>(),
            Money::from_cents(2001)
        );
    }

    #[test]
    fn test_percent_off_rounds_discount_down() {
        assert_eq!(Money::from_cents(1000).percent_off(10).cents(), 900);
        // 10% of 999 is 99.9 cents, 99 of which are taken off
        assert_eq!(Money::from_cents(999).percent_off(10).cents(), 900);
        assert_eq!(Money::from_cents(999).percent_off(100).cents(), 0);
    }

    #[test]
    fn test_arithmetic_near_the_limits_does_not_overflow() {
        let huge = Money::from_cents(i64::MAX - 1);
        assert_eq!(huge.times(3).cents(), i64::MAX);
        assert_eq!((huge + huge).cents(), i64::MAX);
        assert_eq!(Money::from_cents(i64::MIN).times(2).cents(), i64::MIN);
        assert_eq!(
            Money::from_cents(i64::MAX).percent_off(50).cents(),
            i64::MAX - i64::MAX / 2
        );
    }

    #[test]
    fn test_order_line_total_price() {
        let line = OrderLine::new("sku-7", 2, Money::from_cents(999));
        assert_eq!(line.total_price().cents(), 1998);
    }

    #[test]
    fn test_money_serializes_as_cents() {
        let json = serde_json::to_value(Money::from_cents(999)).unwrap();
        assert_eq!(json, serde_json::json!({"cents": 999}));
    }
}
