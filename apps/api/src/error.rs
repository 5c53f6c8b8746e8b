//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Pointlings                             │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /pointlings/7/xp                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Repository? ─── DbError::NotFound ──────────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Engine? ─── CoreError::DailyLimitExceeded ── ApiError ────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 429 { "code": "DAILY_LIMIT_EXCEEDED", "message": "..." }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pointlings_core::{CoreError, ErrorKind};
use pointlings_db::DbError;
use serde::Serialize;

/// Message sent in place of any storage failure detail.
const STORAGE_FAULT_MESSAGE: &str = "An internal error occurred";

/// Message sent when a row fails a schema constraint.
const CONSTRAINT_MESSAGE: &str = "Request violates a data constraint";

/// Error body returned from every failing handler.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_BALANCE",
///   "message": "Insufficient point balance for user 3: price 250"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Balance below the item price (402)
    InsufficientBalance,

    /// Pointling level below the unlock level (403)
    LevelRequirementNotMet,

    /// Resource not found (404)
    NotFound,

    /// Equip toggle on an unowned item (404)
    NotOwned,

    /// Ownership or uniqueness conflict (409)
    AlreadyOwned,

    /// Daily XP cap for the source reached (429)
    DailyLimitExceeded,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientBalance => StatusCode::PAYMENT_REQUIRED,
            ErrorCode::LevelRequirementNotMet => StatusCode::FORBIDDEN,
            ErrorCode::NotFound | ErrorCode::NotOwned => StatusCode::NOT_FOUND,
            ErrorCode::AlreadyOwned => StatusCode::CONFLICT,
            ErrorCode::DailyLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Logs `detail` and returns the redacted internal error.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed with a storage fault");
        ApiError::new(ErrorCode::Internal, STORAGE_FAULT_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::DailyLimitExceeded => ErrorCode::DailyLimitExceeded,
            ErrorKind::InsufficientBalance => ErrorCode::InsufficientBalance,
            ErrorKind::LevelRequirementNotMet => ErrorCode::LevelRequirementNotMet,
            ErrorKind::AlreadyOwned => ErrorCode::AlreadyOwned,
            ErrorKind::NotOwned => ErrorCode::NotOwned,
            ErrorKind::StorageFault => return ApiError::internal(err),
        };

        let message = match err {
            CoreError::Validation(inner) => inner.to_string(),
            other => other.to_string(),
        };

        ApiError::new(code, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::Validation(e) => ApiError::validation(e.to_string()),
            DbError::UniqueViolation { field, .. } => {
                ApiError::new(ErrorCode::AlreadyOwned, format!("{field} already exists"))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::debug!(%message, "Foreign key violation");
                ApiError::not_found("Referenced record", "unknown")
            }
            DbError::CheckViolation { message } => {
                tracing::debug!(%message, "Check constraint violation");
                ApiError::validation(CONSTRAINT_MESSAGE)
            }
            other => ApiError::internal(other),
        }
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
