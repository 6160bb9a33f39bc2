//! # Repository Module
//!
//! Database repository implementations for Daybreak POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                 Repository Pattern Explained                     │
//! │                                                                  │
//! │  SqliteGateway / seed tool                                       │
//! │       │                                                          │
//! │       │  store.catalog().load_products()                         │
//! │       ▼                                                          │
//! │  CatalogRepository                                               │
//! │  ├── load_products / load_outlets                                │
//! │  ├── upsert_product / upsert_outlet                              │
//! │  └── save_snapshot                                               │
//! │       │                                                          │
//! │       │  SQL                                                     │
//! │       ▼                                                          │
//! │  SQLite Database                                                 │
//! │                                                                  │
//! │  Benefits:                                                       │
//! │  • SQL is isolated in one place per aggregate                    │
//! │  • Row structs stay private to the storage layer                 │
//! │  • The rest of the system only sees daybreak-core types          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - products, outlets, stock levels
//! - [`sale::SaleRepository`] - sale transactions and their lines
//! - [`attendance::AttendanceRepository`] - attendance upserts and loads
//! - [`movement::MovementRepository`] - stock movement events

pub mod attendance;
pub mod catalog;
pub mod movement;
pub mod sale;
