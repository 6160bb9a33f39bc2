//! # Stock Ledger
//!
//! The authoritative map of (model, outlet) → on-hand quantity.
//!
//! ## Position in the System
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      Stock Ledger Flow                           │
//! │                                                                  │
//! │  load_catalog() ──► StockLedger::from_catalog ──► authoritative  │
//! │                                                                  │
//! │  draft.add_line ──────► quantity()        (read, no mutation)    │
//! │  commit_sale ─────────► apply_sale()      (deduct w/ rollback)   │
//! │  move_stock ──────────► adjust()          (±delta, non-negative) │
//! │  stock snapshot ──────► snapshot_into()   (export quantities)    │
//! │                                                                  │
//! │  INVARIANT: no (model, outlet) quantity is ever observable       │
//! │  below zero outside a mutating call.                             │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//! Within a process every mutation is immediately visible to subsequent
//! reads. Callers that share a ledger across threads wrap it in a mutex
//! (see daybreak-engine); this type itself is single-threaded state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, StockShortfall};
use crate::types::{Product, SaleLine};

// =============================================================================
// Stock Ledger
// =============================================================================

/// Authoritative per-model, per-outlet quantities.
///
/// Absent keys read as quantity 0; setting a quantity materializes the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockLedger {
    /// model code → (outlet code → quantity)
    levels: HashMap<String, HashMap<String, i64>>,
}

impl StockLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        StockLedger {
            levels: HashMap::new(),
        }
    }

    /// Builds a ledger from a catalog snapshot.
    ///
    /// Every (model, outlet) pair present in a product's stock map becomes
    /// a ledger entry; everything else reads as zero.
    pub fn from_catalog(products: &[Product]) -> Self {
        let mut ledger = StockLedger::new();
        for product in products {
            for (outlet, &quantity) in &product.stock_per_outlet {
                ledger
                    .levels
                    .entry(product.model_code.clone())
                    .or_default()
                    .insert(outlet.clone(), quantity);
            }
        }
        ledger
    }

    /// On-hand quantity for (model, outlet); absent ⇒ 0.
    pub fn quantity(&self, model_code: &str, outlet_code: &str) -> i64 {
        self.levels
            .get(model_code)
            .and_then(|outlets| outlets.get(outlet_code))
            .copied()
            .unwrap_or(0)
    }

    /// Sets the quantity for (model, outlet).
    ///
    /// ## Errors
    /// `InvalidQuantity` if `quantity < 0`. The ledger is unchanged on error.
    pub fn set_quantity(
        &mut self,
        model_code: &str,
        outlet_code: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        if quantity < 0 {
            return Err(CoreError::InvalidQuantity {
                requested: quantity,
            });
        }

        self.levels
            .entry(model_code.to_string())
            .or_default()
            .insert(outlet_code.to_string(), quantity);
        Ok(())
    }

    /// Applies a delta to (model, outlet) and returns the new quantity.
    ///
    /// ## Errors
    /// `InsufficientStock` if the result would be negative. The ledger is
    /// unchanged on error.
    pub fn adjust(&mut self, model_code: &str, outlet_code: &str, delta: i64) -> CoreResult<i64> {
        let current = self.quantity(model_code, outlet_code);
        let next = current + delta;

        if next < 0 {
            return Err(CoreError::InsufficientStock {
                model_code: model_code.to_string(),
                outlet_code: outlet_code.to_string(),
                available: current,
                requested: -delta,
            });
        }

        self.levels
            .entry(model_code.to_string())
            .or_default()
            .insert(outlet_code.to_string(), next);
        Ok(next)
    }

    /// Adds a previously deducted quantity back. Used only by rollback
    /// paths; adding a positive amount to a non-negative quantity cannot
    /// fail.
    pub(crate) fn restore(&mut self, model_code: &str, outlet_code: &str, quantity: i64) {
        let current = self.quantity(model_code, outlet_code);
        self.levels
            .entry(model_code.to_string())
            .or_default()
            .insert(outlet_code.to_string(), current + quantity);
    }

    /// Applies a committed sale's deductions as one unit.
    ///
    /// ## Contract
    /// 1. Re-validates every line against current quantities; fails with
    ///    `StockChanged` listing every offending line, applying nothing.
    /// 2. Applies `-quantity` per line in line order.
    /// 3. If an adjustment fails partway (lines competing for the same
    ///    stock), every already-applied deduction is restored before the
    ///    error is surfaced.
    ///
    /// The ledger is either fully deducted or untouched when this returns.
    pub fn apply_sale(&mut self, outlet_code: &str, lines: &[SaleLine]) -> CoreResult<()> {
        let shortfalls: Vec<StockShortfall> = lines
            .iter()
            .filter(|line| self.quantity(&line.model_code, outlet_code) < line.quantity)
            .map(|line| StockShortfall {
                model_code: line.model_code.clone(),
                outlet_code: outlet_code.to_string(),
                available: self.quantity(&line.model_code, outlet_code),
                requested: line.quantity,
            })
            .collect();

        if !shortfalls.is_empty() {
            return Err(CoreError::StockChanged { lines: shortfalls });
        }

        let mut applied: Vec<&SaleLine> = Vec::with_capacity(lines.len());
        for line in lines {
            match self.adjust(&line.model_code, outlet_code, -line.quantity) {
                Ok(_) => applied.push(line),
                Err(err) => {
                    // Roll back in reverse order; restoring cannot fail.
                    for done in applied.into_iter().rev() {
                        self.restore(&done.model_code, outlet_code, done.quantity);
                    }
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Writes current quantities back into product records, replacing each
    /// product's stock map. Used to produce a durable snapshot.
    pub fn snapshot_into(&self, products: &mut [Product]) {
        for product in products.iter_mut() {
            if let Some(outlets) = self.levels.get(&product.model_code) {
                product.stock_per_outlet = outlets.clone();
            } else {
                product.stock_per_outlet.clear();
            }
        }
    }

    /// Number of models with at least one tracked outlet entry.
    pub fn tracked_models(&self) -> usize {
        self.levels.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
