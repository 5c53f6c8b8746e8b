//! # Validation Module
//!
//! Input validation for the Pointlings backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP binding (axum extractors)                               │
//! │  ├── JSON shape, enum spelling                                         │
//! │  └── Malformed bodies rejected with 400                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ranges (XP per action, balances, unlock levels)                   │
//! │  └── Text rules (display names, nicknames, catalog fields)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (point_balance >= 0), CHECK (level >= 1)                    │
//! │  ├── PRIMARY KEY (pointling_id, item_id)                               │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check here runs before a transaction is opened, so a failure never
//! touches storage.
//!
//! ## Usage
//! ```rust
//! use pointlings_core::types::XpSource;
//! use pointlings_core::validation::{validate_display_name, validate_xp_amount};
//!
//! assert!(validate_xp_amount(XpSource::Play, 20).is_ok());
//! assert!(validate_xp_amount(XpSource::Play, 21).is_err());
//! assert_eq!(validate_display_name("  Mina ").unwrap(), "Mina");
//! ```

use crate::error::ValidationError;
use crate::types::{ItemCategory, NewItem, XpSource};
use crate::{DEFAULT_HISTORY_LIMIT, MAX_DISPLAY_NAME_LEN, MAX_HISTORY_LIMIT, MAX_NICKNAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// XP
// =============================================================================

/// Validates the amount of a single XP grant.
///
/// ## Rules
/// - `1 ≤ amount ≤ source.per_action_cap()`
///
/// The daily cap depends on stored history and is checked inside the
/// grant transaction, not here.
pub fn validate_xp_amount(source: XpSource, amount: i64) -> ValidationResult<()> {
    let cap = source.per_action_cap();

    if amount <= 0 || amount > cap {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: cap,
        });
    }

    Ok(())
}

// =============================================================================
// Text Validators
// =============================================================================

/// Validates a user's display name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_display_name(name: &str) -> ValidationResult<String> {
    required_text("display_name", name, MAX_DISPLAY_NAME_LEN)
}

/// Validates a pointling nickname.
///
/// `None` and blank strings both clear the nickname.
pub fn validate_nickname(nickname: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(nickname) = nickname.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if nickname.chars().count() > MAX_NICKNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "nickname".to_string(),
            max: MAX_NICKNAME_LEN,
        });
    }

    Ok(Some(nickname.to_string()))
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an absolute point balance (zero allowed).
pub fn validate_point_balance(balance: i64) -> ValidationResult<()> {
    if balance < 0 {
        return Err(ValidationError::Negative {
            field: "point_balance".to_string(),
        });
    }

    Ok(())
}

/// Validates a points award (must be positive).
pub fn validate_award_amount(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

/// Resolves a history limit, falling back to the default when absent or
/// out of range.
pub fn history_limit(limit: Option<i64>) -> i64 {
    limit
        .filter(|l| (1..=MAX_HISTORY_LIMIT).contains(l))
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
}

// =============================================================================
// Catalog
// =============================================================================

/// Validates a new catalog entry and returns it with trimmed text fields.
///
/// ## Rules
/// - `name` and `asset_id` must not be empty
/// - `price_points`, when present, must not be negative
/// - `unlock_level`, when present, must be at least 1
/// - ACCESSORY items must carry a slot
pub fn validate_new_item(item: NewItem) -> ValidationResult<NewItem> {
    let name = required_text("name", &item.name, 100)?;
    let asset_id = required_text("asset_id", &item.asset_id, 100)?;

    if item.price_points.is_some_and(|p| p < 0) {
        return Err(ValidationError::Negative {
            field: "price_points".to_string(),
        });
    }

    if item.unlock_level.is_some_and(|l| l < 1) {
        return Err(ValidationError::MustBePositive {
            field: "unlock_level".to_string(),
        });
    }

    if item.category == ItemCategory::Accessory && item.slot.is_none() {
        return Err(ValidationError::Required {
            field: "slot".to_string(),
        });
    }

    Ok(NewItem {
        name,
        asset_id,
        ..item
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
