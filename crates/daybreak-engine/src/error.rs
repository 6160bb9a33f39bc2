//! # Engine Error Types
//!
//! The engine splits failures into two families the caller must treat
//! differently:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Business-rule failures (EngineError::Core, ::UnknownDraft)      │
//! │  └── All state unchanged. Report to the operator, retry freely.  │
//! │                                                                  │
//! │  Persistence failures (EngineError::Persistence)                 │
//! │  └── The in-memory mutation has already committed; durable       │
//! │      storage has not. The caller decides whether to compensate.  │
//! │      This seam is deliberate and documented, never swallowed.    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use daybreak_core::{CoreError, ValidationError};

use crate::gateway::GatewayError;
use crate::sales::DraftId;

/// Orchestration-level errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A business rule refused the operation; no state changed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The draft handle is not (or no longer) open.
    ///
    /// Handles die when the draft is committed or abandoned.
    #[error("Sale draft not found: {0}")]
    UnknownDraft(DraftId),

    /// Durable storage failed after any in-memory mutation had already
    /// been applied.
    #[error("Persistence failed during {operation}: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },
}

impl EngineError {
    /// Wraps a gateway failure with the operation that hit it.
    pub fn persistence(operation: &'static str, err: GatewayError) -> Self {
        EngineError::Persistence {
            operation,
            message: err.message().to_string(),
        }
    }

    /// True for failures that left every piece of state untouched.
    pub fn is_business_failure(&self) -> bool {
        !matches!(self, EngineError::Persistence { .. })
    }
}

/// Input validation failures flow through the core taxonomy.
impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
