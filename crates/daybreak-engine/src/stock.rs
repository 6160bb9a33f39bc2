//! # Stock Operations
//!
//! Outlet-to-outlet transfers, best-effort movement batches, and
//! attendance-gated stock counts.
//!
//! ## Batch Policy
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Best-Effort Movement Batch                    │
//! │                                                                  │
//! │  request: [X1×4, NOPE×1, Z9×2]                                   │
//! │                                                                  │
//! │  X1×4   ─► applied                                               │
//! │  NOPE×1 ─► rejected: "Model not found: NOPE"   (does not block)  │
//! │  Z9×2   ─► applied                                               │
//! │                                                                  │
//! │  The recorded StockMovement carries only the applied items; the  │
//! │  MovementReport carries both lists so the operator sees every    │
//! │  rejection at once.                                              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use daybreak_core::{
    movement, CoreError, MovementItem, MovementKind, MovementReport, MovementRequest,
    RejectedItem, StockMovement,
};

use crate::engine::SalesEngine;
use crate::error::{EngineError, EngineResult};
use crate::gateway::PersistenceGateway;

// =============================================================================
// Results & Reports
// =============================================================================

/// Outcome of a movement batch.
///
/// `movement` is `None` when every item was rejected - nothing was applied,
/// so there is no event to record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementResult {
    pub movement: Option<StockMovement>,
    pub report: MovementReport,
}

/// One model compared during a stock count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCountEntry {
    pub model_code: String,
    pub counted: i64,
    pub recorded: i64,
}

impl StockCountEntry {
    /// Absolute unit difference between counted and recorded.
    pub fn difference(&self) -> i64 {
        (self.counted - self.recorded).abs()
    }

    /// True when the physical count matches the ledger.
    pub fn is_match(&self) -> bool {
        self.counted == self.recorded
    }
}

/// Result of an attendance-gated stock count. Read-only over the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCountReport {
    pub outlet_code: String,
    pub entries: Vec<StockCountEntry>,
}

impl StockCountReport {
    pub fn total_checked(&self) -> usize {
        self.entries.len()
    }

    pub fn matches(&self) -> usize {
        self.entries.iter().filter(|e| e.is_match()).count()
    }

    pub fn mismatches(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_match()).count()
    }
}

// =============================================================================
// Stock Operations
// =============================================================================

impl<G: PersistenceGateway> SalesEngine<G> {
    /// Transfers a quantity of one model between two outlets.
    ///
    /// All-or-nothing: the deduction and the credit either both apply or
    /// neither does. The recorded event is appended to the daily movement
    /// log and a stock snapshot is persisted.
    pub async fn transfer_stock(
        &self,
        model_code: &str,
        from_outlet: &str,
        to_outlet: &str,
        quantity: i64,
        operator_id: &str,
        operator_name: &str,
    ) -> EngineResult<StockMovement> {
        if self.product(model_code).is_none() {
            return Err(CoreError::UnknownModel(model_code.to_string()).into());
        }
        if self.outlet(from_outlet).is_none() {
            return Err(CoreError::UnknownOutlet(from_outlet.to_string()).into());
        }
        if self.outlet(to_outlet).is_none() {
            return Err(CoreError::UnknownOutlet(to_outlet.to_string()).into());
        }

        {
            let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
            movement::apply_transfer(&mut ledger, model_code, from_outlet, to_outlet, quantity)?;
        }

        let event = StockMovement {
            id: Uuid::new_v4().to_string(),
            kind: MovementKind::Transfer,
            source: from_outlet.to_string(),
            destination: to_outlet.to_string(),
            items: vec![MovementItem::new(model_code, quantity)],
            operator_id: operator_id.to_string(),
            operator_name: operator_name.to_string(),
            created_at: Utc::now(),
        };

        info!(
            model = %model_code,
            from = %from_outlet,
            to = %to_outlet,
            quantity,
            "Stock transferred"
        );

        self.record_movement(&event).await?;
        Ok(event)
    }

    /// Applies a movement batch, best-effort per item.
    ///
    /// The outlet side(s) the kind touches must be registered; the
    /// free-text party on the other side of IN/OUT is not validated.
    /// Items are validated and applied independently - one rejection never
    /// blocks the rest.
    pub async fn move_stock(
        &self,
        request: MovementRequest,
        operator_id: &str,
        operator_name: &str,
    ) -> EngineResult<MovementResult> {
        match request.kind {
            MovementKind::In => {
                if self.outlet(&request.destination).is_none() {
                    return Err(CoreError::UnknownOutlet(request.destination.clone()).into());
                }
            }
            MovementKind::Out => {
                if self.outlet(&request.source).is_none() {
                    return Err(CoreError::UnknownOutlet(request.source.clone()).into());
                }
            }
            MovementKind::Transfer => {
                if self.outlet(&request.source).is_none() {
                    return Err(CoreError::UnknownOutlet(request.source.clone()).into());
                }
                if self.outlet(&request.destination).is_none() {
                    return Err(CoreError::UnknownOutlet(request.destination.clone()).into());
                }
            }
        }

        let mut report = MovementReport::default();
        for item in &request.items {
            if self.product(&item.model_code).is_none() {
                report.rejected.push(RejectedItem {
                    item: item.clone(),
                    reason: CoreError::UnknownModel(item.model_code.clone()).to_string(),
                });
                continue;
            }

            let applied = {
                let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
                movement::apply_item(
                    &mut ledger,
                    request.kind,
                    &request.source,
                    &request.destination,
                    &item.model_code,
                    item.quantity,
                )
            };

            match applied {
                Ok(()) => report.applied.push(item.clone()),
                Err(err) => report.rejected.push(RejectedItem {
                    item: item.clone(),
                    reason: err.to_string(),
                }),
            }
        }

        if !report.is_clean() {
            warn!(
                kind = ?request.kind,
                rejected = report.rejected.len(),
                "Movement batch had rejected items"
            );
        }

        if report.applied.is_empty() {
            return Ok(MovementResult {
                movement: None,
                report,
            });
        }

        let event = StockMovement {
            id: Uuid::new_v4().to_string(),
            kind: request.kind,
            source: request.source,
            destination: request.destination,
            items: report.applied.clone(),
            operator_id: operator_id.to_string(),
            operator_name: operator_name.to_string(),
            created_at: Utc::now(),
        };

        info!(
            kind = ?event.kind,
            items = event.items.len(),
            total = report.total_quantity(),
            "Stock movement recorded"
        );

        self.record_movement(&event).await?;
        Ok(MovementResult {
            movement: Some(event),
            report,
        })
    }

    /// Compares physical counts against the ledger for the employee's
    /// shift outlet.
    ///
    /// Hard-gated on an active shift, read-only over the ledger.
    ///
    /// ## Errors
    /// - `NotClockedIn` / `AlreadyClockedOut` from the gate
    /// - `InvalidQuantity` for a negative count
    /// - `UnknownModel` for a count against an unregistered model
    pub fn perform_stock_count(
        &self,
        employee_id: &str,
        counts: &[(String, i64)],
    ) -> EngineResult<StockCountReport> {
        let today = Utc::now().date_naive();
        let outlet_code = {
            let roster = self.roster.lock().expect("roster mutex poisoned");
            roster.shift_outlet(employee_id, today)?.to_string()
        };

        let mut entries = Vec::with_capacity(counts.len());
        for (model_code, counted) in counts {
            if *counted < 0 {
                return Err(CoreError::InvalidQuantity {
                    requested: *counted,
                }
                .into());
            }
            if self.product(model_code).is_none() {
                return Err(CoreError::UnknownModel(model_code.clone()).into());
            }

            let recorded = self.on_hand(model_code, &outlet_code);
            entries.push(StockCountEntry {
                model_code: model_code.clone(),
                counted: *counted,
                recorded,
            });
        }

        let report = StockCountReport {
            outlet_code,
            entries,
        };
        info!(
            outlet = %report.outlet_code,
            checked = report.total_checked(),
            mismatches = report.mismatches(),
            "Stock count performed"
        );
        Ok(report)
    }

    /// Appends the event to the daily movement log and persists a stock
    /// snapshot. Both are post-mutation writes; failures surface as
    /// `Persistence`.
    async fn record_movement(&self, event: &StockMovement) -> EngineResult<()> {
        self.gateway
            .append_movement_log(event)
            .await
            .map_err(|e| EngineError::persistence("append_movement_log", e))?;
        self.persist_stock_snapshot().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryGateway;

    async fn engine() -> SalesEngine<MemoryGateway> {
        SalesEngine::bootstrap(MemoryGateway::with_fixture())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_transfer_round_trip_restores_quantities() {
        let engine = engine().await;
        assert_eq!(engine.on_hand("X1", "C60"), 10);
        assert_eq!(engine.on_hand("X1", "K12"), 0);

        engine
            .transfer_stock("X1", "C60", "K12", 4, "E001", "Farah")
            .await
            .unwrap();
        assert_eq!(engine.on_hand("X1", "C60"), 6);
        assert_eq!(engine.on_hand("X1", "K12"), 4);

        engine
            .transfer_stock("X1", "K12", "C60", 4, "E001", "Farah")
            .await
            .unwrap();
        assert_eq!(engine.on_hand("X1", "C60"), 10);
        assert_eq!(engine.on_hand("X1", "K12"), 0);
    }

    #[tokio::test]
    async fn test_transfer_validates_codes_and_quantity() {
        let engine = engine().await;

        assert!(matches!(
            engine
                .transfer_stock("NOPE", "C60", "K12", 1, "E001", "Farah")
                .await
                .unwrap_err(),
            EngineError::Core(CoreError::UnknownModel(_))
        ));
        assert!(matches!(
            engine
                .transfer_stock("X1", "NOPE", "K12", 1, "E001", "Farah")
                .await
                .unwrap_err(),
            EngineError::Core(CoreError::UnknownOutlet(_))
        ));
        assert!(matches!(
            engine
                .transfer_stock("X1", "C60", "K12", 0, "E001", "Farah")
                .await
                .unwrap_err(),
            EngineError::Core(CoreError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            engine
                .transfer_stock("X1", "C60", "K12", 99, "E001", "Farah")
                .await
                .unwrap_err(),
            EngineError::Core(CoreError::InsufficientStock { .. })
        ));

        // Nothing moved
        assert_eq!(engine.on_hand("X1", "C60"), 10);
        assert_eq!(engine.on_hand("X1", "K12"), 0);
    }

    #[tokio::test]
    async fn test_transfer_appends_movement_log() {
        let engine = engine().await;
        engine
            .transfer_stock("X1", "C60", "K12", 4, "E001", "Farah")
            .await
            .unwrap();

        let log = engine.gateway.movement_log();
        assert_eq!(log.len(), 1);
        assert!(log[0].contains("=== Stock Transfer ==="));
        assert!(log[0].contains("From: C60 (Central 60)"));
        assert!(log[0].contains("- X1 (Quantity:4)"));
        assert!(log[0].contains("Employee in Charge: Farah"));
    }

    #[tokio::test]
    async fn test_batch_is_best_effort() {
        let engine = engine().await;

        let request = MovementRequest {
            kind: MovementKind::Transfer,
            source: "C60".to_string(),
            destination: "K12".to_string(),
            items: vec![
                MovementItem::new("X1", 4),
                MovementItem::new("NOPE", 1),
                MovementItem::new("Z9", 500), // exceeds C60 quantity
            ],
        };

        let result = engine.move_stock(request, "E001", "Farah").await.unwrap();
        assert_eq!(result.report.applied, vec![MovementItem::new("X1", 4)]);
        assert_eq!(result.report.rejected.len(), 2);
        assert!(result.report.rejected[0].reason.contains("Model not found"));
        assert!(result.report.rejected[1]
            .reason
            .contains("Insufficient stock"));

        // The rejected items did not block the applied one
        assert_eq!(engine.on_hand("X1", "K12"), 4);

        let movement = result.movement.unwrap();
        assert_eq!(movement.items, vec![MovementItem::new("X1", 4)]);
    }

    #[tokio::test]
    async fn test_batch_with_nothing_applied_records_no_event() {
        let engine = engine().await;

        let request = MovementRequest {
            kind: MovementKind::Out,
            source: "C60".to_string(),
            destination: "Disposal".to_string(),
            items: vec![MovementItem::new("NOPE", 1)],
        };

        let result = engine.move_stock(request, "E001", "Farah").await.unwrap();
        assert!(result.movement.is_none());
        assert!(engine.gateway.movement_log().is_empty());
    }

    #[tokio::test]
    async fn test_stock_in_accepts_free_text_source() {
        let engine = engine().await;

        let request = MovementRequest {
            kind: MovementKind::In,
            source: "HQ Warehouse".to_string(),
            destination: "C60".to_string(),
            items: vec![MovementItem::new("X1", 15)],
        };

        engine.move_stock(request, "E001", "Farah").await.unwrap();
        assert_eq!(engine.on_hand("X1", "C60"), 25);
    }

    #[tokio::test]
    async fn test_stock_count_is_gated_and_read_only() {
        let engine = engine().await;

        let counts = vec![("X1".to_string(), 10)];
        let err = engine.perform_stock_count("E001", &counts).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotClockedIn { .. })
        ));

        engine.clock_in("E001", "Farah", "C60").await.unwrap();

        // X1 counted correctly; Z9 physical count is 4 against 2 recorded
        let counts = vec![("X1".to_string(), 10), ("Z9".to_string(), 4)];
        let report = engine.perform_stock_count("E001", &counts).unwrap();
        assert_eq!(report.outlet_code, "C60");
        assert_eq!(report.total_checked(), 2);
        assert_eq!(report.matches(), 1);
        assert_eq!(report.mismatches(), 1);
        assert_eq!(report.entries[1].difference(), 2);

        // Counting never mutates the ledger
        assert_eq!(engine.on_hand("X1", "C60"), 10);
    }

    #[tokio::test]
    async fn test_stock_count_rejects_bad_input() {
        let engine = engine().await;
        engine.clock_in("E001", "Farah", "C60").await.unwrap();

        let err = engine
            .perform_stock_count("E001", &[("X1".to_string(), -1)])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InvalidQuantity { .. })
        ));

        let err = engine
            .perform_stock_count("E001", &[("NOPE".to_string(), 1)])
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::UnknownModel(_))
        ));
    }
}
