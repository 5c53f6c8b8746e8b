//! # Error Types
//!
//! Domain-specific error types for pointlings-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pointlings-core errors (this file)                                    │
//! │  ├── CoreError        - Business outcomes + opaque storage faults      │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── ErrorKind        - Flat classification callers branch on          │
//! │                                                                         │
//! │  pointlings-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                         (converted to CoreError::Storage at the port)  │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rejections vs Faults
//! Daily limits, insufficient balance, ownership conflicts and level gates
//! are *expected* outcomes. They roll the enclosing transaction back like
//! any other error, but callers treat them as answers, not failures. Only
//! [`CoreError::Storage`] is a fault.

use thiserror::Error;

use crate::types::{ItemId, PointlingId, UserId, XpSource};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation. Nothing was touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced user, pointling or item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Granting this XP would push the source past its daily cap.
    ///
    /// ## When This Occurs
    /// ```text
    /// RECEIPT cap = 50/day
    ///      │
    ///      ▼
    /// granted today: 45, requested: 10
    ///      │
    ///      ▼
    /// 45 + 10 > 50 → DailyLimitExceeded (retry tomorrow, UTC)
    /// ```
    #[error(
        "Daily XP limit reached for {xp_source}: {granted_today} granted today, \
         {requested} requested, cap {cap}"
    )]
    DailyLimitExceeded {
        xp_source: XpSource,
        granted_today: i64,
        requested: i64,
        cap: i64,
    },

    /// The conditional debit matched no row: balance is below the price.
    #[error("Insufficient point balance for user {user_id}: price {price}")]
    InsufficientBalance { user_id: UserId, price: i64 },

    /// The item is gated behind a level the pointling has not reached.
    #[error(
        "Level requirement not met for item {item_id}: requires level {required_level}, \
         pointling is level {current_level}"
    )]
    LevelRequirementNotMet {
        item_id: ItemId,
        required_level: i64,
        current_level: i64,
    },

    /// The pointling already owns the item.
    #[error("Item {item_id} already owned by pointling {pointling_id}")]
    AlreadyOwned {
        pointling_id: PointlingId,
        item_id: ItemId,
    },

    /// Equip toggle on an item the pointling does not own.
    #[error("Pointling {pointling_id} does not own item {item_id}")]
    NotOwned {
        pointling_id: PointlingId,
        item_id: ItemId,
    },

    /// Unexpected failure from the storage collaborator.
    ///
    /// The message is for logs only; API responses never expose it.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::DailyLimitExceeded { .. } => ErrorKind::DailyLimitExceeded,
            CoreError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            CoreError::LevelRequirementNotMet { .. } => ErrorKind::LevelRequirementNotMet,
            CoreError::AlreadyOwned { .. } => ErrorKind::AlreadyOwned,
            CoreError::NotOwned { .. } => ErrorKind::NotOwned,
            CoreError::Storage(_) => ErrorKind::StorageFault,
        }
    }

    /// True for named business outcomes (everything except storage faults).
    pub fn is_rejection(&self) -> bool {
        self.kind() != ErrorKind::StorageFault
    }
}

/// Flat classification of [`CoreError`].
///
/// ## HTTP Mapping (apps/api)
/// ```text
/// Validation              → 400
/// InsufficientBalance     → 402
/// LevelRequirementNotMet  → 403
/// NotFound / NotOwned     → 404
/// AlreadyOwned            → 409
/// DailyLimitExceeded      → 429
/// StorageFault            → 500
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    DailyLimitExceeded,
    InsufficientBalance,
    LevelRequirementNotMet,
    AlreadyOwned,
    NotOwned,
    StorageFault,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Raised before any transaction is opened.
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

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Item has no price and can only be unlocked.
    #[error("Item {item_id} cannot be purchased with points")]
    NotPurchasable { item_id: ItemId },

    /// Pointling belongs to a different user than the one paying.
    #[error("Pointling {pointling_id} does not belong to user {user_id}")]
    ForeignPointling {
        pointling_id: PointlingId,
        user_id: UserId,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DailyLimitExceeded {
            xp_source: XpSource::Receipt,
            granted_today: 45,
            requested: 10,
            cap: 50,
        };
        assert_eq!(
            err.to_string(),
            "Daily XP limit reached for RECEIPT: 45 granted today, 10 requested, cap 50"
        );

        let err = CoreError::not_found("Pointling", 42);
        assert_eq!(err.to_string(), "Pointling not found: 42");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "display_name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_only_storage_is_a_fault() {
        assert!(!CoreError::Storage("disk I/O error".into()).is_rejection());
        assert!(CoreError::InsufficientBalance {
            user_id: 1,
            price: 100
        }
        .is_rejection());
        assert!(CoreError::NotOwned {
            pointling_id: 1,
            item_id: 2
        }
        .is_rejection());
    }
}
