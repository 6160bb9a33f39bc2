//! # Error Types
//!
//! Domain-specific error types for daybreak-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Error Types                             │
//! │                                                                 │
//! │  daybreak-core errors (this file)                               │
//! │  ├── CoreError        - Business rule violations                │
//! │  └── ValidationError  - Input validation failures               │
//! │                                                                 │
//! │  daybreak-db errors (separate crate)                            │
//! │  └── StoreError       - Storage operation failures              │
//! │                                                                 │
//! │  daybreak-engine errors (separate crate)                        │
//! │  └── EngineError      - Core failures vs persistence failures   │
//! │                                                                 │
//! │  Flow: ValidationError → CoreError → EngineError → Caller       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (model code, outlet, quantities)
//! 3. Errors are enum variants, never String
//! 4. A business-rule failure always leaves state unchanged

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Stock Shortfall
// =============================================================================

/// One line that failed commit-time re-validation.
///
/// Collected into [`CoreError::StockChanged`] so the caller sees every
/// offending line at once instead of fixing them one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockShortfall {
    pub model_code: String,
    pub outlet_code: String,
    pub available: i64,
    pub requested: i64,
}

impl std::fmt::Display for StockShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}: available {}, requested {}",
            self.model_code, self.outlet_code, self.available, self.requested
        )
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity is zero or negative where a positive amount is required,
    /// or negative where a non-negative amount is required.
    #[error("Invalid quantity: {requested}")]
    InvalidQuantity { requested: i64 },

    /// Insufficient stock to complete the operation.
    ///
    /// ## When This Occurs
    /// - A draft line asks for more than is available for this transaction
    /// - A ledger adjustment would drive a quantity negative
    /// - A transfer exceeds the source outlet's on-hand quantity
    #[error("Insufficient stock for {model_code} at {outlet_code}: available {available}, requested {requested}")]
    InsufficientStock {
        model_code: String,
        outlet_code: String,
        available: i64,
        requested: i64,
    },

    /// Model code is not in the catalog.
    #[error("Model not found: {0}")]
    UnknownModel(String),

    /// Outlet code is not registered.
    #[error("Outlet not found: {0}")]
    UnknownOutlet(String),

    /// The employee has no open attendance record for the day.
    ///
    /// Sales and stock counts are hard-gated on an active shift.
    #[error("Employee {employee_id} has not clocked in on {date}")]
    NotClockedIn {
        employee_id: String,
        date: NaiveDate,
    },

    /// The employee's attendance record for the day is already closed.
    #[error("Employee {employee_id} already clocked out on {date}")]
    AlreadyClockedOut {
        employee_id: String,
        date: NaiveDate,
    },

    /// The employee already has an attendance record for the day.
    ///
    /// At most one record exists per (employee, date); a second clock-in
    /// is rejected even after clock-out.
    #[error("Employee {employee_id} already clocked in on {date}")]
    AlreadyClockedIn {
        employee_id: String,
        date: NaiveDate,
    },

    /// The employee is on shift, but at a different outlet than the
    /// transaction's outlet.
    #[error("Employee {employee_id} is on shift at {shift_outlet}, not {requested_outlet}")]
    WrongOutlet {
        employee_id: String,
        shift_outlet: String,
        requested_outlet: String,
    },

    /// Commit-time re-validation failed: the ledger no longer covers one
    /// or more lines added earlier. No deduction has been applied.
    #[error("Stock changed since lines were added ({} line(s) short)", lines.len())]
    StockChanged { lines: Vec<StockShortfall> },

    /// Commit was requested on a draft with no lines.
    #[error("Transaction has no line items")]
    EmptyTransaction,

    /// Draft has exceeded the maximum allowed line items.
    #[error("Draft cannot have more than {max} line items")]
    DraftTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad characters in a code, unparsable money).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., registering an existing model code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
