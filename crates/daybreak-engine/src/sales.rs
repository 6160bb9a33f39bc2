//! # Sales Operations
//!
//! Draft handles, line entry, and the commit path.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Draft Lifecycle                            │
//! │                                                                  │
//! │  open_sale ──► DraftId ──► add_sale_line (×N) ──► commit_sale    │
//! │                   │                                   │          │
//! │                   └──────────► abandon_sale           │          │
//! │                                (no trace left)        ▼          │
//! │                                              SaleTransaction     │
//! │                                                                  │
//! │  A business-rule failure during commit re-opens the draft under  │
//! │  the same handle so the operator can correct and retry. After a  │
//! │  successful in-memory commit the handle is dead - a persistence  │
//! │  failure does NOT resurrect it.                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use daybreak_core::{
    validation, CoreError, Money, PaymentMethod, SaleDraft, SaleLine, SaleTransaction,
};

use crate::engine::SalesEngine;
use crate::error::{EngineError, EngineResult};
use crate::gateway::PersistenceGateway;

// =============================================================================
// Draft Handle
// =============================================================================

/// Opaque handle to an open sale draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(Uuid);

impl DraftId {
    pub(crate) fn new() -> Self {
        DraftId(Uuid::new_v4())
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// =============================================================================
// Sales Operations
// =============================================================================

impl<G: PersistenceGateway> SalesEngine<G> {
    /// Opens a new sale draft for an outlet and customer.
    ///
    /// ## Errors
    /// - `UnknownOutlet` if the outlet is not registered
    /// - validation errors for the customer name
    pub fn open_sale(&self, outlet_code: &str, customer_name: &str) -> EngineResult<DraftId> {
        validation::validate_customer_name(customer_name)?;
        if self.outlet(outlet_code).is_none() {
            return Err(CoreError::UnknownOutlet(outlet_code.to_string()).into());
        }

        let id = DraftId::new();
        let draft = SaleDraft::open(outlet_code, customer_name.trim());

        self.drafts
            .lock()
            .expect("drafts mutex poisoned")
            .insert(id, draft);

        debug!(draft = %id, outlet = %outlet_code, "Sale draft opened");
        Ok(id)
    }

    /// Adds a line item to an open draft.
    ///
    /// Reads the ledger under its lock, then applies the draft's own
    /// reservation rules. The ledger itself is not mutated - concurrent
    /// activity between now and commit is re-validated at commit.
    ///
    /// ## Errors
    /// - `UnknownDraft` if the handle is not open
    /// - `UnknownModel` if the model is not in the catalog
    /// - `InvalidQuantity` / `InsufficientStock` per the draft contract
    pub fn add_sale_line(
        &self,
        draft_id: DraftId,
        model_code: &str,
        quantity: i64,
    ) -> EngineResult<SaleLine> {
        let product = self
            .product(model_code)
            .ok_or_else(|| CoreError::UnknownModel(model_code.to_string()))?;

        let mut drafts = self.drafts.lock().expect("drafts mutex poisoned");
        let draft = drafts
            .get_mut(&draft_id)
            .ok_or(EngineError::UnknownDraft(draft_id))?;

        // Serialize the availability read against all ledger mutations.
        let on_hand = self
            .ledger
            .lock()
            .expect("ledger mutex poisoned")
            .quantity(model_code, draft.outlet_code());

        let line = draft.add_line(&product, quantity, on_hand)?.clone();
        debug!(
            draft = %draft_id,
            model = %model_code,
            quantity,
            reserved = draft.reserved(model_code),
            "Line added"
        );
        Ok(line)
    }

    /// Current lines of an open draft.
    pub fn draft_lines(&self, draft_id: DraftId) -> EngineResult<Vec<SaleLine>> {
        let drafts = self.drafts.lock().expect("drafts mutex poisoned");
        let draft = drafts
            .get(&draft_id)
            .ok_or(EngineError::UnknownDraft(draft_id))?;
        Ok(draft.lines().to_vec())
    }

    /// Running total of an open draft.
    pub fn draft_total(&self, draft_id: DraftId) -> EngineResult<Money> {
        let drafts = self.drafts.lock().expect("drafts mutex poisoned");
        let draft = drafts
            .get(&draft_id)
            .ok_or(EngineError::UnknownDraft(draft_id))?;
        Ok(draft.total())
    }

    /// Discards an open draft. Reservations were draft-local, so nothing
    /// else needs undoing.
    pub fn abandon_sale(&self, draft_id: DraftId) -> EngineResult<()> {
        let removed = self
            .drafts
            .lock()
            .expect("drafts mutex poisoned")
            .remove(&draft_id);

        match removed {
            Some(_) => {
                debug!(draft = %draft_id, "Sale draft abandoned");
                Ok(())
            }
            None => Err(EngineError::UnknownDraft(draft_id)),
        }
    }

    /// Commits a draft: the single linearization point of a sale.
    ///
    /// ## Contract
    /// 1. Attendance gate - `NotClockedIn` / `AlreadyClockedOut`, and
    ///    `WrongOutlet` when the shift is at a different outlet than the
    ///    draft.
    /// 2. Re-validates every line against the live ledger - `StockChanged`
    ///    listing the offending lines.
    /// 3. Applies the deductions in line order; a partial failure rolls
    ///    every applied deduction back before the error surfaces.
    /// 4. Persists the transaction and a stock snapshot. A failure here
    ///    surfaces as `Persistence` after the in-memory commit - the
    ///    caller owns the compensation decision.
    ///
    /// On any business-rule failure the draft is re-opened under the same
    /// handle; after a successful in-memory commit the handle is dead.
    pub async fn commit_sale(
        &self,
        draft_id: DraftId,
        payment_method: PaymentMethod,
        employee_id: &str,
    ) -> EngineResult<SaleTransaction> {
        validation::validate_employee_id(employee_id)?;

        // Take the draft out; re-insert on business failure.
        let draft = self
            .drafts
            .lock()
            .expect("drafts mutex poisoned")
            .remove(&draft_id)
            .ok_or(EngineError::UnknownDraft(draft_id))?;

        match self.apply_commit(&draft, payment_method, employee_id) {
            Ok(transaction) => {
                // In-memory commit done; the handle is dead from here on.
                if let Err(err) = self
                    .gateway
                    .save_transaction(&transaction)
                    .await
                    .map_err(|e| EngineError::persistence("save_transaction", e))
                {
                    warn!(
                        transaction = %transaction.id,
                        "Ledger committed but transaction persistence failed"
                    );
                    return Err(err);
                }
                self.persist_stock_snapshot().await?;

                info!(
                    transaction = %transaction.id,
                    outlet = %transaction.outlet_code,
                    lines = transaction.lines.len(),
                    total = %transaction.total(),
                    "Sale committed"
                );
                Ok(transaction)
            }
            Err(err) => {
                self.drafts
                    .lock()
                    .expect("drafts mutex poisoned")
                    .insert(draft_id, draft);
                Err(err)
            }
        }
    }

    /// The synchronous half of commit: gate, re-validate, deduct.
    ///
    /// Holds each lock only for its own step and never touches the
    /// gateway.
    fn apply_commit(
        &self,
        draft: &SaleDraft,
        payment_method: PaymentMethod,
        employee_id: &str,
    ) -> EngineResult<SaleTransaction> {
        if draft.is_empty() {
            return Err(CoreError::EmptyTransaction.into());
        }

        let today = Utc::now().date_naive();

        // 1. Attendance gate (hard precondition)
        let employee_name = {
            let roster = self.roster.lock().expect("roster mutex poisoned");
            let shift_outlet = roster.shift_outlet(employee_id, today)?;
            if shift_outlet != draft.outlet_code() {
                return Err(CoreError::WrongOutlet {
                    employee_id: employee_id.to_string(),
                    shift_outlet: shift_outlet.to_string(),
                    requested_outlet: draft.outlet_code().to_string(),
                }
                .into());
            }
            roster
                .find(employee_id, today)
                .map(|r| r.employee_name.clone())
                .unwrap_or_else(|| employee_id.to_string())
        };

        // 2 + 3. Re-validate and deduct under one ledger lock
        {
            let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
            ledger.apply_sale(draft.outlet_code(), draft.lines())?;
        }

        let total_cents = draft.lines().iter().map(|l| l.subtotal_cents).sum();
        Ok(SaleTransaction {
            id: Uuid::new_v4().to_string(),
            outlet_code: draft.outlet_code().to_string(),
            customer_name: draft.customer_name().to_string(),
            payment_method,
            employee_id: employee_id.to_string(),
            employee_name,
            created_at: Utc::now(),
            lines: draft.lines().to_vec(),
            total_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryGateway;
    use daybreak_core::StockShortfall;

    async fn engine_with_shift() -> SalesEngine<MemoryGateway> {
        let gateway = MemoryGateway::with_fixture();
        let engine = SalesEngine::bootstrap(gateway).await.unwrap();
        engine.clock_in("E001", "Farah", "C60").await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_full_sale_scenario() {
        // Catalog fixture: X1 at C60, quantity 10, price RM100.00
        let engine = engine_with_shift().await;

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 6).unwrap();

        let err = engine.add_sale_line(draft, "X1", 5).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InsufficientStock {
                available: 4,
                requested: 5,
                ..
            })
        ));

        engine.add_sale_line(draft, "X1", 4).unwrap();

        let transaction = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap();

        assert_eq!(transaction.lines.len(), 2);
        assert_eq!(transaction.lines[0].subtotal_cents, 60000);
        assert_eq!(transaction.lines[1].subtotal_cents, 40000);
        assert_eq!(transaction.total_cents, 100_000);
        assert_eq!(transaction.employee_name, "Farah");
        assert_eq!(engine.on_hand("X1", "C60"), 0);

        // Persisted as one unit
        let saved = engine.gateway.saved_transactions();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, transaction.id);
        let snapshots = engine.gateway.snapshots();
        assert!(!snapshots.is_empty());
    }

    #[tokio::test]
    async fn test_commit_requires_active_shift() {
        let gateway = MemoryGateway::with_fixture();
        let engine = SalesEngine::bootstrap(gateway).await.unwrap();

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 1).unwrap();

        let err = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::NotClockedIn { .. })
        ));

        // Ledger untouched, draft still open for retry
        assert_eq!(engine.on_hand("X1", "C60"), 10);
        assert_eq!(engine.draft_lines(draft).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_rejected_after_clock_out() {
        let engine = engine_with_shift().await;
        engine.clock_out("E001").await.unwrap();

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 1).unwrap();

        let err = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::AlreadyClockedOut { .. })
        ));
    }

    #[tokio::test]
    async fn test_commit_rejects_wrong_outlet() {
        let engine = engine_with_shift().await; // shift at C60

        let draft = engine.open_sale("K12", "Aisyah").unwrap();
        // K12 holds 5 units of Z9 in the fixture
        engine.add_sale_line(draft, "Z9", 1).unwrap();

        let err = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::WrongOutlet { .. })
        ));
    }

    #[tokio::test]
    async fn test_commit_revalidates_against_live_ledger() {
        let engine = engine_with_shift().await;

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 8).unwrap();

        // External activity drains the stock between add and commit
        engine.set_stock_level("X1", "C60", 2).await.unwrap();

        let err = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap_err();
        match err {
            EngineError::Core(CoreError::StockChanged { lines }) => {
                assert_eq!(
                    lines,
                    vec![StockShortfall {
                        model_code: "X1".to_string(),
                        outlet_code: "C60".to_string(),
                        available: 2,
                        requested: 8,
                    }]
                );
            }
            other => panic!("expected StockChanged, got {other:?}"),
        }

        // Nothing deducted, nothing persisted
        assert_eq!(engine.on_hand("X1", "C60"), 2);
        assert!(engine.gateway.saved_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_commit_empty_draft_rejected() {
        let engine = engine_with_shift().await;
        let draft = engine.open_sale("C60", "Aisyah").unwrap();

        let err = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::EmptyTransaction)
        ));
        // Still open
        assert!(engine.draft_lines(draft).is_ok());
    }

    #[tokio::test]
    async fn test_persistence_failure_is_distinct_and_keeps_ledger() {
        let engine = engine_with_shift().await;
        engine.gateway.fail_saves(true);

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 4).unwrap();

        let err = engine
            .commit_sale(draft, PaymentMethod::Cash, "E001")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Persistence { .. }));
        assert!(!err.is_business_failure());

        // The documented seam: in-memory ledger already committed
        assert_eq!(engine.on_hand("X1", "C60"), 6);
        // The handle is dead after the in-memory commit
        assert!(matches!(
            engine.draft_lines(draft).unwrap_err(),
            EngineError::UnknownDraft(_)
        ));
    }

    #[tokio::test]
    async fn test_abandon_discards_without_trace() {
        let engine = engine_with_shift().await;

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft, "X1", 6).unwrap();
        engine.abandon_sale(draft).unwrap();

        assert_eq!(engine.on_hand("X1", "C60"), 10);
        assert!(matches!(
            engine.add_sale_line(draft, "X1", 1).unwrap_err(),
            EngineError::UnknownDraft(_)
        ));

        // A fresh draft sees the full quantity again
        let draft2 = engine.open_sale("C60", "Aisyah").unwrap();
        engine.add_sale_line(draft2, "X1", 10).unwrap();
    }

    #[tokio::test]
    async fn test_unknown_model_and_outlet() {
        let engine = engine_with_shift().await;

        assert!(matches!(
            engine.open_sale("NOPE", "Aisyah").unwrap_err(),
            EngineError::Core(CoreError::UnknownOutlet(_))
        ));

        let draft = engine.open_sale("C60", "Aisyah").unwrap();
        assert!(matches!(
            engine.add_sale_line(draft, "NOPE", 1).unwrap_err(),
            EngineError::Core(CoreError::UnknownModel(_))
        ));
    }
}
