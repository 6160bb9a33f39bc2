//! # Persistence Gateway
//!
//! The engine's contract with durable storage. The engine *calls* this
//! trait; it never implements storage itself.
//!
//! ## Gateway Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Persistence Boundary                         │
//! │                                                                  │
//! │  SalesEngine ──────► PersistenceGateway (THIS TRAIT)             │
//! │                           │                                      │
//! │            ┌──────────────┴───────────────┐                      │
//! │            ▼                              ▼                      │
//! │      SqliteGateway                 FlatFileGateway               │
//! │      (daybreak-db,                 (daybreak-db,                 │
//! │       authoritative)                interchange files)           │
//! │                                                                  │
//! │  The engine treats save_transaction + the ledger mutation as     │
//! │  one logical unit: a gateway failure after the in-memory commit  │
//! │  surfaces as EngineError::Persistence, distinct from every       │
//! │  business-rule failure, so the caller can decide whether to      │
//! │  compensate.                                                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use thiserror::Error;

use daybreak_core::{AttendanceRecord, Outlet, Product, SaleTransaction, StockMovement};

// =============================================================================
// Gateway Error
// =============================================================================

/// A storage-side failure, already reduced to a displayable message.
///
/// Gateway implementations map their native error types (sqlx errors, I/O
/// errors) into this before the engine sees them; the engine wraps it into
/// [`crate::EngineError::Persistence`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct GatewayError(String);

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        GatewayError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError(err.to_string())
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

// =============================================================================
// Persistence Gateway Trait
// =============================================================================

/// Durable storage as seen by the engine.
///
/// ## Contract
/// - `load_*` methods return everything known at startup; an empty store
///   yields empty vectors, not errors.
/// - `save_transaction` persists a committed sale and its lines as one
///   unit on the storage side.
/// - `save_stock_snapshot` replaces the stored per-outlet quantities with
///   the ledger's current view.
/// - `save_attendance` upserts one (employee, date) record.
/// - `append_movement_log` appends a human-readable event entry to the
///   daily movement log - informational only, never read back for
///   reconciliation.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Loads every catalog product, including per-outlet quantities.
    async fn load_catalog(&self) -> GatewayResult<Vec<Product>>;

    /// Loads every registered outlet.
    async fn load_outlets(&self) -> GatewayResult<Vec<Outlet>>;

    /// Loads every attendance record.
    async fn load_attendance(&self) -> GatewayResult<Vec<AttendanceRecord>>;

    /// Persists a committed sale transaction and its lines.
    async fn save_transaction(&self, transaction: &SaleTransaction) -> GatewayResult<()>;

    /// Persists the current stock quantities for every product.
    async fn save_stock_snapshot(&self, products: &[Product]) -> GatewayResult<()>;

    /// Upserts one attendance record.
    async fn save_attendance(&self, record: &AttendanceRecord) -> GatewayResult<()>;

    /// Appends a movement event to the daily movement log.
    async fn append_movement_log(&self, movement: &StockMovement) -> GatewayResult<()>;
}
