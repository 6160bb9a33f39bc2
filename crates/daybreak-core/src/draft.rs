//! # Sale Draft
//!
//! In-memory accumulation of line items for one sale, with reservation
//! bookkeeping that stops a single transaction from selling the same unit
//! twice across its own lines.
//!
//! ## Reservation Model
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                  Draft Reservations (advisory)                   │
//! │                                                                  │
//! │  On-hand for X1 at C60: 10                                       │
//! │                                                                  │
//! │  add_line(X1, 6)   available = 10 − 0 = 10   ✓  reserved: 6      │
//! │  add_line(X1, 5)   available = 10 − 6 = 4    ✗  InsufficientStock│
//! │  add_line(X1, 4)   available = 10 − 6 = 4    ✓  reserved: 10     │
//! │                                                                  │
//! │  The ledger itself is UNTOUCHED until commit. Reservations are   │
//! │  draft-local bookkeeping; concurrent external activity between   │
//! │  open and commit is possible and is re-validated at commit.      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! Open drafts exist only in memory. An abandoned draft leaves no trace;
//! a committed draft becomes an immutable
//! [`SaleTransaction`](crate::types::SaleTransaction).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, SaleLine};
use crate::validation;
use crate::MAX_DRAFT_LINES;

// =============================================================================
// Sale Draft
// =============================================================================

/// A sale transaction under construction.
///
/// ## Invariants
/// - `reserved[model]` always equals the sum of line quantities for that
///   model across the draft
/// - line count never exceeds [`MAX_DRAFT_LINES`]
/// - line quantities are validated positive on entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDraft {
    outlet_code: String,
    customer_name: String,
    lines: Vec<SaleLine>,
    /// model code → quantity reserved by earlier lines of this draft
    reserved: HashMap<String, i64>,
    opened_at: DateTime<Utc>,
}

impl SaleDraft {
    /// Opens an empty draft for an outlet and customer.
    pub fn open(outlet_code: impl Into<String>, customer_name: impl Into<String>) -> Self {
        SaleDraft {
            outlet_code: outlet_code.into(),
            customer_name: customer_name.into(),
            lines: Vec::new(),
            reserved: HashMap::new(),
            opened_at: Utc::now(),
        }
    }

    /// Outlet this draft sells from.
    pub fn outlet_code(&self) -> &str {
        &self.outlet_code
    }

    /// Customer recorded on the draft.
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// When the draft was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Accumulated line items, in entry order.
    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// Quantity of a model already reserved by this draft's lines.
    pub fn reserved(&self, model_code: &str) -> i64 {
        self.reserved.get(model_code).copied().unwrap_or(0)
    }

    /// Checks whether the draft has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of line items.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Running total across all lines.
    pub fn total(&self) -> Money {
        Money::from_cents(self.lines.iter().map(|l| l.subtotal_cents).sum())
    }

    /// Adds a line item, reserving stock against the rest of this draft.
    ///
    /// `on_hand` is the ledger quantity for (model, outlet) observed by the
    /// caller; the draft never reads the ledger itself.
    ///
    /// ## Contract
    /// 1. `InvalidQuantity` if `quantity <= 0`
    /// 2. `available = on_hand − reserved(model)`
    /// 3. `InsufficientStock` if `quantity > available`
    /// 4. Appends a line at the product's current unit price and bumps the
    ///    reservation counter
    ///
    /// On error the draft is unchanged; earlier reservations stay intact.
    pub fn add_line(
        &mut self,
        product: &Product,
        quantity: i64,
        on_hand: i64,
    ) -> CoreResult<&SaleLine> {
        if quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }
        validation::validate_quantity(quantity)?;

        if self.lines.len() >= MAX_DRAFT_LINES {
            return Err(CoreError::DraftTooLarge {
                max: MAX_DRAFT_LINES,
            });
        }

        let already_reserved = self.reserved(&product.model_code);
        let available = on_hand - already_reserved;
        if quantity > available {
            return Err(CoreError::InsufficientStock {
                model_code: product.model_code.clone(),
                outlet_code: self.outlet_code.clone(),
                available: available.max(0),
                requested: quantity,
            });
        }

        let index = self.lines.len();
        self.lines.push(SaleLine::new(product, quantity));
        self.reserved
            .insert(product.model_code.clone(), already_reserved + quantity);

        Ok(&self.lines[index])
    }

    /// Removes a line by index, releasing its reservation.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<SaleLine> {
        if index >= self.lines.len() {
            return Err(CoreError::Validation(
                crate::error::ValidationError::OutOfRange {
                    field: "line index".to_string(),
                    min: 0,
                    max: self.lines.len() as i64 - 1,
                },
            ));
        }
        let line = self.lines.remove(index);
        let remaining = self.reserved(&line.model_code) - line.quantity;
        if remaining > 0 {
            self.reserved.insert(line.model_code.clone(), remaining);
        } else {
            self.reserved.remove(&line.model_code);
        }
        Ok(line)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn x1() -> Product {
        let mut p = Product::new("X1", "Daybreak X1", 10000);
        p.set_stock("C60", 10);
        p
    }

    #[test]
    fn test_reservations_accumulate_across_lines() {
        let product = x1();
        let mut draft = SaleDraft::open("C60", "Aisyah");

        // On-hand is 10 throughout; the draft's own reservations shrink
        // what later lines may take.
        draft.add_line(&product, 6, 10).unwrap();
        assert_eq!(draft.reserved("X1"), 6);

        let err = draft.add_line(&product, 5, 10).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 4,
                requested: 5,
                ..
            }
        ));
        // The failed line must not disturb the existing reservation
        assert_eq!(draft.reserved("X1"), 6);
        assert_eq!(draft.line_count(), 1);

        draft.add_line(&product, 4, 10).unwrap();
        assert_eq!(draft.reserved("X1"), 10);
        assert_eq!(draft.line_count(), 2);
        assert_eq!(draft.total().cents(), 100_000);
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let product = x1();
        let mut draft = SaleDraft::open("C60", "Aisyah");

        assert!(matches!(
            draft.add_line(&product, 0, 10).unwrap_err(),
            CoreError::InvalidQuantity { requested: 0 }
        ));
        assert!(matches!(
            draft.add_line(&product, -3, 10).unwrap_err(),
            CoreError::InvalidQuantity { requested: -3 }
        ));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_line_snapshots_unit_price() {
        let product = x1();
        let mut draft = SaleDraft::open("C60", "Aisyah");

        let line = draft.add_line(&product, 6, 10).unwrap();
        assert_eq!(line.unit_price_cents, 10000);
        assert_eq!(line.subtotal_cents, 60000);
    }

    #[test]
    fn test_remove_line_releases_reservation() {
        let product = x1();
        let mut draft = SaleDraft::open("C60", "Aisyah");

        draft.add_line(&product, 6, 10).unwrap();
        draft.add_line(&product, 4, 10).unwrap();
        assert_eq!(draft.reserved("X1"), 10);

        draft.remove_line(0).unwrap();
        assert_eq!(draft.reserved("X1"), 4);

        // The freed reservation is available again
        draft.add_line(&product, 6, 10).unwrap();
        assert_eq!(draft.reserved("X1"), 10);
    }

    #[test]
    fn test_draft_line_ceiling() {
        let product = x1();
        let mut draft = SaleDraft::open("C60", "Aisyah");

        for _ in 0..MAX_DRAFT_LINES {
            draft.add_line(&product, 1, i64::MAX / 2).unwrap();
        }
        assert!(matches!(
            draft.add_line(&product, 1, i64::MAX / 2).unwrap_err(),
            CoreError::DraftTooLarge { .. }
        ));
    }
}
