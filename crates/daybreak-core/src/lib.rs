//! # daybreak-core: Pure Business Logic for Daybreak POS
//!
//! This crate is the heart of Daybreak POS. It holds the stock ledger, the
//! sale drafting rules and the attendance roster as pure, I/O-free logic.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Daybreak POS Architecture                     │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │              Callers (CLI / desktop / services)           │  │
//! │  └────────────────────────────┬──────────────────────────────┘  │
//! │                               │                                 │
//! │  ┌────────────────────────────▼──────────────────────────────┐  │
//! │  │                   daybreak-engine                         │  │
//! │  │    open_sale, add_line, commit_sale, move_stock, ...      │  │
//! │  └────────────────────────────┬──────────────────────────────┘  │
//! │                               │                                 │
//! │  ┌────────────────────────────▼──────────────────────────────┐  │
//! │  │              ★ daybreak-core (THIS CRATE) ★               │  │
//! │  │                                                           │  │
//! │  │   ┌────────┐ ┌────────┐ ┌───────┐ ┌──────────┐            │  │
//! │  │   │ ledger │ │ draft  │ │ money │ │attendance│            │  │
//! │  │   │ adjust │ │reserve │ │ cents │ │  roster  │            │  │
//! │  │   └────────┘ └────────┘ └───────┘ └──────────┘            │  │
//! │  │                                                           │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS      │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Outlet, SaleTransaction, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`ledger`] - Authoritative (model, outlet) → quantity map
//! - [`draft`] - In-memory sale drafting with reservation bookkeeping
//! - [`attendance`] - Attendance roster and shift gating
//! - [`movement`] - Stock movement application and event formatting
//! - [`summary`] - Read-only daily sales aggregation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attendance;
pub mod draft;
pub mod error;
pub mod ledger;
pub mod money;
pub mod movement;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use daybreak_core::Money` instead of
// `use daybreak_core::money::Money`

pub use attendance::{AttendanceRecord, AttendanceRoster};
pub use draft::SaleDraft;
pub use error::{CoreError, CoreResult, StockShortfall, ValidationError};
pub use ledger::StockLedger;
pub use money::Money;
pub use movement::{
    MovementItem, MovementKind, MovementReport, MovementRequest, RejectedItem, StockMovement,
};
pub use summary::DailySalesSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items allowed in a single sale draft
///
/// ## Business Reason
/// Prevents runaway drafts and keeps transactions a cashier can review.
pub const MAX_DRAFT_LINES: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
