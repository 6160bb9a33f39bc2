//! # Stock Movement
//!
//! Moving quantities into, out of, and between outlets.
//!
//! ## Movement Kinds
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │   IN        supplier/external ──► destination outlet (+qty)      │
//! │   OUT       source outlet (−qty) ──► disposal/external           │
//! │   TRANSFER  source outlet (−qty) ──► destination outlet (+qty)   │
//! │                                                                  │
//! │   The non-ledger side of IN/OUT is a free-text party name        │
//! │   (e.g. "HQ Warehouse"); only outlet quantities are tracked.     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Batch Policy
//! A movement event carries several (model, quantity) pairs. Each pair is
//! validated and applied independently - a shortfall or unknown model on
//! one pair never blocks the others, and every rejection is reported
//! per-item in the [`MovementReport`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ledger::StockLedger;

// =============================================================================
// Movement Kind
// =============================================================================

/// The direction of a stock movement event.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Goods received into an outlet.
    In,
    /// Goods leaving an outlet (disposal, return to supplier).
    Out,
    /// Goods moved between two outlets.
    Transfer,
}

impl MovementKind {
    /// Heading used in the daily movement log.
    pub const fn title(&self) -> &'static str {
        match self {
            MovementKind::In => "Stock In",
            MovementKind::Out => "Stock Out",
            MovementKind::Transfer => "Stock Transfer",
        }
    }
}

// =============================================================================
// Movement Items and Requests
// =============================================================================

/// One (model, quantity) pair within a movement event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementItem {
    pub model_code: String,
    pub quantity: i64,
}

impl MovementItem {
    pub fn new(model_code: impl Into<String>, quantity: i64) -> Self {
        MovementItem {
            model_code: model_code.into(),
            quantity,
        }
    }
}

/// A requested movement event, before application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRequest {
    pub kind: MovementKind,
    /// Source outlet code for OUT/TRANSFER; free-text party for IN.
    pub source: String,
    /// Destination outlet code for IN/TRANSFER; free-text party for OUT.
    pub destination: String,
    pub items: Vec<MovementItem>,
}

/// An item the batch skipped, with the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedItem {
    pub item: MovementItem,
    pub reason: String,
}

/// Outcome of a best-effort movement batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementReport {
    /// Items applied to the ledger, in request order.
    pub applied: Vec<MovementItem>,
    /// Items skipped, each with its reason.
    pub rejected: Vec<RejectedItem>,
}

impl MovementReport {
    /// Total units applied across the batch.
    pub fn total_quantity(&self) -> i64 {
        self.applied.iter().map(|i| i.quantity).sum()
    }

    /// True when every requested item was applied.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

// =============================================================================
// Completed Movement Event
// =============================================================================

/// A completed stock movement, recorded after application.
///
/// Applied atomically per item; recorded as an event, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub kind: MovementKind,
    pub source: String,
    pub destination: String,
    /// Items actually applied (rejected items are not part of the event).
    pub items: Vec<MovementItem>,
    pub operator_id: String,
    pub operator_name: String,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Renders the human-readable daily-log entry for this event.
    ///
    /// Informational only - never parsed back for reconciliation.
    pub fn log_entry(&self, source_name: &str, destination_name: &str) -> String {
        let mut lines = String::new();
        lines.push_str(&format!("=== {} ===\n", self.kind.title()));
        lines.push_str(&format!("Date: {}\n", self.created_at.format("%Y-%m-%d")));
        lines.push_str(&format!("Time: {}\n", self.created_at.format("%I:%M %p")));
        lines.push_str(&format!("From: {} ({})\n", self.source, source_name));
        lines.push_str(&format!("To: {} ({})\n", self.destination, destination_name));
        lines.push_str("Models:\n");
        for item in &self.items {
            lines.push_str(&format!(
                "- {} (Quantity:{})\n",
                item.model_code, item.quantity
            ));
        }
        let total: i64 = self.items.iter().map(|i| i.quantity).sum();
        lines.push_str(&format!("Total Quantity: {}\n", total));
        lines.push_str(&format!("Employee in Charge: {}", self.operator_name));
        lines
    }
}

// =============================================================================
// Ledger Application
// =============================================================================

/// Transfers a quantity of one model between two outlets.
///
/// ## Contract
/// - `InvalidQuantity` if `quantity <= 0`
/// - `InsufficientStock` if the source outlet holds less than `quantity`
/// - Applies `-quantity` at the source then `+quantity` at the destination;
///   if the second adjustment fails the first is reversed before returning
///
/// The ledger is either fully moved or untouched when this returns.
pub fn apply_transfer(
    ledger: &mut StockLedger,
    model_code: &str,
    from_outlet: &str,
    to_outlet: &str,
    quantity: i64,
) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(CoreError::InvalidQuantity {
            requested: quantity,
        });
    }

    let available = ledger.quantity(model_code, from_outlet);
    if available < quantity {
        return Err(CoreError::InsufficientStock {
            model_code: model_code.to_string(),
            outlet_code: from_outlet.to_string(),
            available,
            requested: quantity,
        });
    }

    ledger.adjust(model_code, from_outlet, -quantity)?;
    if let Err(err) = ledger.adjust(model_code, to_outlet, quantity) {
        // Cannot happen for a positive delta, but the deduction must never
        // survive a failed credit.
        ledger.restore(model_code, from_outlet, quantity);
        return Err(err);
    }

    Ok(())
}

/// Applies one movement item to the ledger according to the movement kind.
pub fn apply_item(
    ledger: &mut StockLedger,
    kind: MovementKind,
    source: &str,
    destination: &str,
    model_code: &str,
    quantity: i64,
) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(CoreError::InvalidQuantity {
            requested: quantity,
        });
    }

    match kind {
        MovementKind::In => {
            ledger.adjust(model_code, destination, quantity)?;
            Ok(())
        }
        MovementKind::Out => {
            let available = ledger.quantity(model_code, source);
            if available < quantity {
                return Err(CoreError::InsufficientStock {
                    model_code: model_code.to_string(),
                    outlet_code: source.to_string(),
                    available,
                    requested: quantity,
                });
            }
            ledger.adjust(model_code, source, -quantity)?;
            Ok(())
        }
        MovementKind::Transfer => apply_transfer(ledger, model_code, source, destination, quantity),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
