//! # Domain Types
//!
//! Core domain types used throughout Daybreak POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                             │
//! │                                                                  │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐      │
//! │  │    Product     │  │     Outlet     │  │ SaleTransaction│      │
//! │  │  ────────────  │  │  ────────────  │  │  ────────────  │      │
//! │  │  model_code    │  │  code          │  │  id (UUID)     │      │
//! │  │  price_cents   │  │  name          │  │  outlet_code   │      │
//! │  │  stock map     │  │                │  │  lines[]       │      │
//! │  └────────────────┘  └────────────────┘  └────────────────┘      │
//! │                                                                  │
//! │  ┌────────────────┐  ┌────────────────┐                          │
//! │  │    SaleLine    │  │ PaymentMethod  │                          │
//! │  │  ────────────  │  │  ────────────  │                          │
//! │  │  model_code    │  │  Cash          │                          │
//! │  │  quantity      │  │  Card          │                          │
//! │  │  price snapshot│  │  EWallet       │                          │
//! │  └────────────────┘  └────────────────┘                          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Products and outlets are keyed by their business codes (model code,
//! outlet code); committed transactions get a UUID v4.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog item available for sale.
///
/// Carries the per-outlet on-hand quantities for interchange with durable
/// storage; at runtime the [`crate::ledger::StockLedger`] is authoritative
/// and the map here is only read at load time and rewritten at snapshot
/// time. Absent outlet ⇒ quantity 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique model code - business identifier.
    pub model_code: String,

    /// Display name shown to the cashier.
    pub display_name: String,

    /// Unit price in cents (smallest currency unit). Non-negative.
    pub price_cents: i64,

    /// On-hand quantity per outlet code.
    pub stock_per_outlet: HashMap<String, i64>,
}

impl Product {
    /// Creates a product with no stock anywhere.
    pub fn new(
        model_code: impl Into<String>,
        display_name: impl Into<String>,
        price_cents: i64,
    ) -> Self {
        Product {
            model_code: model_code.into(),
            display_name: display_name.into(),
            price_cents,
            stock_per_outlet: HashMap::new(),
        }
    }

    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// On-hand quantity at an outlet; absent outlet ⇒ 0.
    pub fn stock(&self, outlet_code: &str) -> i64 {
        self.stock_per_outlet.get(outlet_code).copied().unwrap_or(0)
    }

    /// Sets the on-hand quantity at an outlet.
    pub fn set_stock(&mut self, outlet_code: impl Into<String>, quantity: i64) {
        self.stock_per_outlet.insert(outlet_code.into(), quantity);
    }
}

// =============================================================================
// Outlet
// =============================================================================

/// A physical retail location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    /// Short code, e.g. `C60`.
    pub code: String,

    /// Display name, e.g. `Central 60`.
    pub name: String,
}

impl Outlet {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Outlet {
            code: code.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// E-wallet / QR payment.
    EWallet,
}

impl PaymentMethod {
    /// Stable label used in interchange files and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::EWallet => "E-Wallet",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the spellings cashiers actually type: `cash`, `card`, `credit`,
/// `debit`, `e-wallet`, `ewallet`.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "e-wallet" | "ewallet" | "wallet" => Ok(PaymentMethod::EWallet),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: vec![
                    "Cash".to_string(),
                    "Card".to_string(),
                    "E-Wallet".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// One line item in a sale transaction.
/// Uses snapshot pattern to freeze the unit price at time of drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Model code of the product sold.
    pub model_code: String,

    /// Quantity sold (positive).
    pub quantity: i64,

    /// Unit price in cents at time of drafting (frozen).
    pub unit_price_cents: i64,

    /// Line subtotal (unit_price × quantity).
    pub subtotal_cents: i64,
}

impl SaleLine {
    /// Creates a line from a product, freezing the current unit price.
    pub fn new(product: &Product, quantity: i64) -> Self {
        SaleLine {
            model_code: product.model_code.clone(),
            quantity,
            unit_price_cents: product.price_cents,
            subtotal_cents: product.price_cents * quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Sale Transaction
// =============================================================================

/// A committed sale.
///
/// Built by [`crate::draft::SaleDraft`], becomes immutable at commit.
/// Open drafts exist only in memory and are discarded if abandoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleTransaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Outlet the sale happened at.
    pub outlet_code: String,

    /// Free-text customer name.
    pub customer_name: String,

    /// How the customer paid.
    pub payment_method: PaymentMethod,

    /// Cashier who committed the sale.
    pub employee_id: String,
    pub employee_name: String,

    /// When the sale was committed.
    pub created_at: DateTime<Utc>,

    /// Ordered line items.
    pub lines: Vec<SaleLine>,

    /// Grand total in cents (sum of line subtotals).
    pub total_cents: i64,
}

impl SaleTransaction {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total units across all lines.
    pub fn units(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_stock_defaults_to_zero() {
        let mut product = Product::new("X1", "Daybreak X1", 10000);
        assert_eq!(product.stock("C60"), 0);

        product.set_stock("C60", 10);
        assert_eq!(product.stock("C60"), 10);
        assert_eq!(product.stock("K12"), 0);
    }

    #[test]
    fn test_sale_line_snapshots_price() {
        let mut product = Product::new("X1", "Daybreak X1", 10000);
        let line = SaleLine::new(&product, 6);
        assert_eq!(line.subtotal_cents, 60000);

        // Later price changes do not affect the frozen line
        product.price_cents = 99999;
        assert_eq!(line.unit_price_cents, 10000);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "debit".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Card
        );
        assert_eq!(
            "E-Wallet".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::EWallet
        );
        assert!("gold bars".parse::<PaymentMethod>().is_err());
    }
}
