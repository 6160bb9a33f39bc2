//! # daybreak-engine: Stock Ledger & Transaction Engine
//!
//! The orchestration layer of Daybreak POS. This crate owns the in-memory
//! [`StockLedger`](daybreak_core::StockLedger) and exposes every stateful
//! operation as a method on [`SalesEngine`].
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Sale Commit Path                         │
//! │                                                                 │
//! │  open_sale(outlet, customer) ───► DraftId                       │
//! │  add_sale_line(draft, model, qty)  (repeatable)                 │
//! │       │  reads ledger, reserves inside the draft only           │
//! │       ▼                                                         │
//! │  commit_sale(draft, method, employee)                           │
//! │       │ 1. attendance gate (hard precondition)                  │
//! │       │ 2. re-validate lines against live ledger                │
//! │       │ 3. deduct in line order, rollback on partial failure    │
//! │       │ 4. persist transaction + stock snapshot                 │
//! │       ▼                                                         │
//! │  SaleTransaction (immutable)                                    │
//! │                                                                 │
//! │  Commit is the single linearization point. Reservation          │
//! │  bookkeeping before it is advisory; the in-memory mutation      │
//! │  plus persistence is all-or-nothing from the caller's view,     │
//! │  except the documented PersistenceFailed seam.                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//! One logical owner of the ledger per process. Every piece of shared
//! state sits behind a `std::sync::Mutex`; a single global ledger lock
//! serializes all quantity mutations. No lock is held across an `.await`:
//! in-memory mutation happens first, the lock is released, then the
//! gateway is called.
//!
//! ## Modules
//!
//! - [`engine`] - [`SalesEngine`] state, bootstrap, catalog registration
//! - [`sales`] - draft handles, line entry, the commit path
//! - [`stock`] - transfers, best-effort movement batches, stock counts
//! - [`attendance`] - clock in/out and the shift gate surface
//! - [`gateway`] - the [`PersistenceGateway`] trait consumed by the engine
//! - [`error`] - [`EngineError`] separating business from persistence failures

pub mod attendance;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod sales;
pub mod stock;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::SalesEngine;
pub use error::{EngineError, EngineResult};
pub use gateway::{GatewayError, PersistenceGateway};
pub use sales::DraftId;
pub use stock::{MovementResult, StockCountEntry, StockCountReport};
