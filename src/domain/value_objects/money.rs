//! Money Value Object
//!
//! Immutable monetary value with currency.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object with currency
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Create a new money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create money from i64 cents
    pub fn from_cents(cents: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency,
        }
    }

    /// Create BRL money
    pub fn brl(amount: Decimal) -> Self {
        Self::new(amount, Currency::BRL)
    }

    /// Get the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the currency
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Check if positive
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.amount == Decimal::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

/// Currency enum
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    BRL,
    USD,
    EUR,
    Other(String),
}

impl Currency {
    pub fn code(&self) -> &str {
        match self {
            Self::BRL => "BRL",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.to_uppercase().as_str() {
            "" | "BRL" => Self::BRL,
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::BRL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let money = Money::brl(Decimal::new(10050, 2)); // R$ 100.50
        assert_eq!(money.amount(), Decimal::new(10050, 2));
        assert_eq!(money.currency(), &Currency::BRL);
        assert!(money.is_positive());
    }

    #[test]
    fn test_money_from_cents() {
        let money = Money::from_cents(1050, Currency::USD);
        assert_eq!(money.amount(), Decimal::new(1050, 2));
    }

    #[test]
    fn test_money_not_positive() {
        assert!(!Money::brl(Decimal::ZERO).is_positive());
        assert!(!Money::brl(Decimal::new(-1, 0)).is_positive());
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("brl"), Currency::BRL);
        assert_eq!(Currency::from_code(""), Currency::BRL);
        assert_eq!(
            Currency::from_code("GBP"),
            Currency::Other("GBP".to_string())
        );
    }
}
