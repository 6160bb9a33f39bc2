//! In-memory gateway double used by the engine's own tests.
//!
//! Records every write so assertions can inspect exactly what the engine
//! persisted, and can be flipped into a failing mode to exercise the
//! `Persistence` error path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use daybreak_core::{AttendanceRecord, Outlet, Product, SaleTransaction, StockMovement};

use crate::gateway::{GatewayError, GatewayResult, PersistenceGateway};

#[derive(Debug, Default)]
pub(crate) struct MemoryGateway {
    products: Vec<Product>,
    outlets: Vec<Outlet>,
    attendance: Vec<AttendanceRecord>,
    saved_transactions: Mutex<Vec<SaleTransaction>>,
    saved_snapshots: Mutex<Vec<Vec<Product>>>,
    saved_attendance: Mutex<Vec<AttendanceRecord>>,
    movement_entries: Mutex<Vec<String>>,
    fail_saves: AtomicBool,
}

impl MemoryGateway {
    /// The standard test fixture:
    /// - outlets C60 "Central 60" and K12 "Klang 12"
    /// - X1 at RM100.00 with 10 on hand at C60
    /// - Z9 at RM25.00 with 2 on hand at C60 and 5 at K12
    pub(crate) fn with_fixture() -> Self {
        let mut x1 = Product::new("X1", "Daybreak X1", 10000);
        x1.set_stock("C60", 10);
        let mut z9 = Product::new("Z9", "Daybreak Z9", 2500);
        z9.set_stock("C60", 2);
        z9.set_stock("K12", 5);

        MemoryGateway {
            products: vec![x1, z9],
            outlets: vec![
                Outlet::new("C60", "Central 60"),
                Outlet::new("K12", "Klang 12"),
            ],
            ..Default::default()
        }
    }

    /// Makes every subsequent save fail with a gateway error.
    pub(crate) fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check_save(&self) -> GatewayResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            Err(GatewayError::new("simulated storage failure"))
        } else {
            Ok(())
        }
    }

    pub(crate) fn saved_transactions(&self) -> Vec<SaleTransaction> {
        self.saved_transactions
            .lock()
            .expect("mutex poisoned")
            .clone()
    }

    pub(crate) fn snapshots(&self) -> Vec<Vec<Product>> {
        self.saved_snapshots.lock().expect("mutex poisoned").clone()
    }

    pub(crate) fn saved_attendance(&self) -> Vec<AttendanceRecord> {
        self.saved_attendance.lock().expect("mutex poisoned").clone()
    }

    pub(crate) fn movement_log(&self) -> Vec<String> {
        self.movement_entries.lock().expect("mutex poisoned").clone()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn load_catalog(&self) -> GatewayResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn load_outlets(&self) -> GatewayResult<Vec<Outlet>> {
        Ok(self.outlets.clone())
    }

    async fn load_attendance(&self) -> GatewayResult<Vec<AttendanceRecord>> {
        Ok(self.attendance.clone())
    }

    async fn save_transaction(&self, transaction: &SaleTransaction) -> GatewayResult<()> {
        self.check_save()?;
        self.saved_transactions
            .lock()
            .expect("mutex poisoned")
            .push(transaction.clone());
        Ok(())
    }

    async fn save_stock_snapshot(&self, products: &[Product]) -> GatewayResult<()> {
        self.check_save()?;
        self.saved_snapshots
            .lock()
            .expect("mutex poisoned")
            .push(products.to_vec());
        Ok(())
    }

    async fn save_attendance(&self, record: &AttendanceRecord) -> GatewayResult<()> {
        self.check_save()?;
        self.saved_attendance
            .lock()
            .expect("mutex poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn append_movement_log(&self, movement: &StockMovement) -> GatewayResult<()> {
        self.check_save()?;
        // Mirror what a file-backed gateway writes: the formatted entry
        let entry = movement.log_entry("Central 60", "Klang 12");
        self.movement_entries
            .lock()
            .expect("mutex poisoned")
            .push(entry);
        Ok(())
    }
}
