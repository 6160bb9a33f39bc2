//! # Sales Engine State
//!
//! [`SalesEngine`] is the single logical owner of the stock ledger within a
//! process. Everything mutable sits behind a `std::sync::Mutex`.
//!
//! ## Thread Safety
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      Engine State Locks                          │
//! │                                                                  │
//! │  ledger   Mutex<StockLedger>        one global lock serializes   │
//! │                                     every quantity mutation      │
//! │  catalog  Mutex<HashMap<_,Product>> price / existence lookups    │
//! │  outlets  Mutex<HashMap<_,Outlet>>  registration lookups         │
//! │  roster   Mutex<AttendanceRoster>   the shift gate               │
//! │  drafts   Mutex<HashMap<_,Draft>>   open sale drafts             │
//! │                                                                  │
//! │  RULES                                                           │
//! │  • locks are taken one at a time, scopes kept tight              │
//! │  • no lock is ever held across an .await                         │
//! │  • persistence happens strictly after lock release               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Not RwLock?
//! Operations are short and most of them write. A RwLock would add
//! complexity with minimal benefit at POS scale.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, info};

use daybreak_core::{
    validation, AttendanceRoster, CoreError, Outlet, Product, SaleDraft, StockLedger,
    ValidationError,
};

use crate::error::{EngineError, EngineResult};
use crate::gateway::PersistenceGateway;
use crate::sales::DraftId;

// =============================================================================
// Sales Engine
// =============================================================================

/// The stock ledger and transaction engine.
///
/// Generic over its [`PersistenceGateway`] so storage can be SQLite, flat
/// files, or an in-memory double in tests.
#[derive(Debug)]
pub struct SalesEngine<G> {
    pub(crate) gateway: G,
    pub(crate) ledger: Mutex<StockLedger>,
    pub(crate) catalog: Mutex<HashMap<String, Product>>,
    pub(crate) outlets: Mutex<HashMap<String, Outlet>>,
    pub(crate) roster: Mutex<AttendanceRoster>,
    pub(crate) drafts: Mutex<HashMap<DraftId, SaleDraft>>,
}

impl<G: PersistenceGateway> SalesEngine<G> {
    /// Loads all state from the gateway and builds a ready engine.
    ///
    /// ## What This Does
    /// 1. Loads the catalog and seeds the authoritative ledger from it
    /// 2. Loads registered outlets
    /// 3. Loads the attendance roster
    pub async fn bootstrap(gateway: G) -> EngineResult<Self> {
        let products = gateway
            .load_catalog()
            .await
            .map_err(|e| EngineError::persistence("load_catalog", e))?;
        let outlets = gateway
            .load_outlets()
            .await
            .map_err(|e| EngineError::persistence("load_outlets", e))?;
        let attendance = gateway
            .load_attendance()
            .await
            .map_err(|e| EngineError::persistence("load_attendance", e))?;

        info!(
            models = products.len(),
            outlets = outlets.len(),
            attendance = attendance.len(),
            "Sales engine bootstrapped"
        );

        let ledger = StockLedger::from_catalog(&products);

        Ok(SalesEngine {
            gateway,
            ledger: Mutex::new(ledger),
            catalog: Mutex::new(
                products
                    .into_iter()
                    .map(|p| (p.model_code.clone(), p))
                    .collect(),
            ),
            outlets: Mutex::new(outlets.into_iter().map(|o| (o.code.clone(), o)).collect()),
            roster: Mutex::new(AttendanceRoster::from_records(attendance)),
            drafts: Mutex::new(HashMap::new()),
        })
    }

    // =========================================================================
    // Catalog & Outlet Registration
    // =========================================================================

    /// Registers a new outlet.
    pub fn register_outlet(&self, outlet: Outlet) -> EngineResult<()> {
        validation::validate_outlet_code(&outlet.code)?;

        let mut outlets = self.outlets.lock().expect("outlets mutex poisoned");
        if outlets.contains_key(&outlet.code) {
            return Err(CoreError::Validation(ValidationError::Duplicate {
                field: "outlet code".to_string(),
                value: outlet.code.clone(),
            })
            .into());
        }

        debug!(code = %outlet.code, name = %outlet.name, "Outlet registered");
        outlets.insert(outlet.code.clone(), outlet);
        Ok(())
    }

    /// Registers a new catalog product, seeding the ledger from its stock
    /// map.
    pub fn register_product(&self, product: Product) -> EngineResult<()> {
        validation::validate_model_code(&product.model_code)?;
        validation::validate_price_cents(product.price_cents)?;

        let mut catalog = self.catalog.lock().expect("catalog mutex poisoned");
        if catalog.contains_key(&product.model_code) {
            return Err(CoreError::Validation(ValidationError::Duplicate {
                field: "model code".to_string(),
                value: product.model_code.clone(),
            })
            .into());
        }

        {
            let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
            for (outlet, &quantity) in &product.stock_per_outlet {
                ledger.set_quantity(&product.model_code, outlet, quantity)?;
            }
        }

        debug!(model = %product.model_code, price = product.price_cents, "Product registered");
        catalog.insert(product.model_code.clone(), product);
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// A catalog product by model code, if registered.
    pub fn product(&self, model_code: &str) -> Option<Product> {
        self.catalog
            .lock()
            .expect("catalog mutex poisoned")
            .get(model_code)
            .cloned()
    }

    /// An outlet by code, if registered.
    pub fn outlet(&self, code: &str) -> Option<Outlet> {
        self.outlets
            .lock()
            .expect("outlets mutex poisoned")
            .get(code)
            .cloned()
    }

    /// Current on-hand quantity for (model, outlet). Absent ⇒ 0.
    pub fn on_hand(&self, model_code: &str, outlet_code: &str) -> i64 {
        self.ledger
            .lock()
            .expect("ledger mutex poisoned")
            .quantity(model_code, outlet_code)
    }

    /// Overwrites the quantity for (model, outlet) and persists a snapshot.
    ///
    /// Used for stock corrections after a physical count.
    pub async fn set_stock_level(
        &self,
        model_code: &str,
        outlet_code: &str,
        quantity: i64,
    ) -> EngineResult<()> {
        if self.product(model_code).is_none() {
            return Err(CoreError::UnknownModel(model_code.to_string()).into());
        }
        if self.outlet(outlet_code).is_none() {
            return Err(CoreError::UnknownOutlet(outlet_code.to_string()).into());
        }

        {
            let mut ledger = self.ledger.lock().expect("ledger mutex poisoned");
            ledger.set_quantity(model_code, outlet_code, quantity)?;
        }

        info!(model = %model_code, outlet = %outlet_code, quantity, "Stock level set");
        self.persist_stock_snapshot().await
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Catalog products with the ledger's current quantities written in.
    pub fn stock_snapshot(&self) -> Vec<Product> {
        let mut products: Vec<Product> = {
            let catalog = self.catalog.lock().expect("catalog mutex poisoned");
            catalog.values().cloned().collect()
        };
        // Stable order keeps interchange files diffable
        products.sort_by(|a, b| a.model_code.cmp(&b.model_code));

        let ledger = self.ledger.lock().expect("ledger mutex poisoned");
        ledger.snapshot_into(&mut products);
        products
    }

    /// Writes the current snapshot through the gateway.
    pub(crate) async fn persist_stock_snapshot(&self) -> EngineResult<()> {
        let snapshot = self.stock_snapshot();
        self.gateway
            .save_stock_snapshot(&snapshot)
            .await
            .map_err(|e| EngineError::persistence("save_stock_snapshot", e))
    }

    /// The gateway this engine persists through.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
