//! # SQLite Gateway
//!
//! The authoritative [`PersistenceGateway`] implementation, delegating to
//! the repositories over one shared pool.
//!
//! The engine's daily movement "log" lands here as relational rows in
//! `stock_movements` / `stock_movement_items`; the flat-file gateway is
//! the one that writes the human-readable text form.

use async_trait::async_trait;

use daybreak_core::{AttendanceRecord, Outlet, Product, SaleTransaction, StockMovement};
use daybreak_engine::{GatewayError, PersistenceGateway};

use crate::pool::Store;

/// SQLite-backed persistence gateway.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    store: Store,
}

impl SqliteGateway {
    /// Wraps a connected store.
    pub fn new(store: Store) -> Self {
        SqliteGateway { store }
    }

    /// The underlying store, for collaborators that need repository
    /// access beyond the gateway surface (e.g. daily summaries).
    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    async fn load_catalog(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self.store.catalog().load_products().await?)
    }

    async fn load_outlets(&self) -> Result<Vec<Outlet>, GatewayError> {
        Ok(self.store.catalog().load_outlets().await?)
    }

    async fn load_attendance(&self) -> Result<Vec<AttendanceRecord>, GatewayError> {
        Ok(self.store.attendance().load_all().await?)
    }

    async fn save_transaction(&self, transaction: &SaleTransaction) -> Result<(), GatewayError> {
        Ok(self.store.sales().insert_transaction(transaction).await?)
    }

    async fn save_stock_snapshot(&self, products: &[Product]) -> Result<(), GatewayError> {
        Ok(self.store.catalog().save_snapshot(products).await?)
    }

    async fn save_attendance(&self, record: &AttendanceRecord) -> Result<(), GatewayError> {
        Ok(self.store.attendance().upsert(record).await?)
    }

    async fn append_movement_log(&self, movement: &StockMovement) -> Result<(), GatewayError> {
        Ok(self.store.movements().insert(movement).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
