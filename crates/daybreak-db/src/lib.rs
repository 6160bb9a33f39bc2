//! # daybreak-db: Storage Layer for Daybreak POS
//!
//! Durable storage behind the engine's
//! [`PersistenceGateway`](daybreak_engine::PersistenceGateway) trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Daybreak POS Data Flow                      │
//! │                                                                 │
//! │  SalesEngine (daybreak-engine)                                  │
//! │       │ PersistenceGateway calls                                │
//! │       ▼                                                         │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │                  daybreak-db (THIS CRATE)                 │  │
//! │  │                                                           │  │
//! │  │  ┌─────────────┐   ┌──────────────┐   ┌───────────────┐   │  │
//! │  │  │    Store    │   │ Repositories │   │  Migrations   │   │  │
//! │  │  │  (pool.rs)  │◄──│ catalog/sale │   │  (embedded)   │   │  │
//! │  │  │  SqlitePool │   │ attendance   │   │ 001_init.sql  │   │  │
//! │  │  └─────────────┘   │ movement     │   └───────────────┘   │  │
//! │  │                    └──────────────┘                       │  │
//! │  │  ┌─────────────────┐   ┌─────────────────────────────┐    │  │
//! │  │  │  SqliteGateway  │   │      FlatFileGateway        │    │  │
//! │  │  │ (authoritative) │   │ (CSV/text interchange)      │    │  │
//! │  │  └─────────────────┘   └─────────────────────────────┘    │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Choosing a Store
//! The SQLite store is the single authoritative store. The flat-file
//! store speaks the legacy interchange formats (catalog CSV, attendance
//! CSV, append-only sales CSV, daily movement log) for export and for
//! standalone single-register deployments. The two are alternative
//! gateway implementations, never dual-written by the engine.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Repository implementations (catalog, sale, ...)
//! - [`gateway`] - [`SqliteGateway`] over the repositories
//! - [`flatfile`] - [`FlatFileGateway`] over interchange files

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod flatfile;
pub mod gateway;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use flatfile::FlatFileGateway;
pub use gateway::SqliteGateway;
pub use pool::{Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::attendance::AttendanceRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::movement::MovementRepository;
pub use repository::sale::SaleRepository;
