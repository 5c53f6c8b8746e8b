//! # User Repository
//!
//! Accounts and their point balances.
//!
//! ## Balance Writes
//! ```text
//! award_points       balance = balance + amount            (amount > 0)
//! set_point_balance  balance = new_balance                 (new_balance ≥ 0)
//! debit_balance      balance = balance - price
//!                    WHERE balance >= price                (0 rows → can't afford)
//! ```
//! The `CHECK (point_balance >= 0)` column constraint backs all three.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pointlings_core::validation::{validate_award_amount, validate_display_name, validate_point_balance};
use pointlings_core::{Page, User, UserId};

const USER_COLUMNS: &str = "user_id, display_name, point_balance, created_at";

// =============================================================================
// Shared Queries
// =============================================================================

pub(crate) async fn fetch_user<'e, E>(executor: E, user_id: UserId) -> DbResult<Option<User>>
where
    E: SqliteExecutor<'e>,
{
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

/// Conditional debit. `None` when the user is missing or can't afford it.
pub(crate) async fn debit_balance<'e, E>(
    executor: E,
    user_id: UserId,
    amount: i64,
) -> DbResult<Option<i64>>
where
    E: SqliteExecutor<'e>,
{
    let balance = sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE users
        SET point_balance = point_balance - ?2
        WHERE user_id = ?1 AND point_balance >= ?2
        RETURNING point_balance
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .fetch_optional(executor)
    .await?;

    Ok(balance)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates a user with a starting balance.
    pub async fn create_user(&self, display_name: &str, initial_balance: i64) -> DbResult<User> {
        let display_name = validate_display_name(display_name)?;
        validate_point_balance(initial_balance)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (display_name, point_balance, created_at)
             VALUES (?1, ?2, ?3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(display_name)
        .bind(initial_balance)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!(user_id = user.user_id, "User created");
        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, user_id: UserId) -> DbResult<Option<User>> {
        fetch_user(&self.pool, user_id).await
    }

    /// Lists users, newest first.
    pub async fn list(&self, page: Page) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             ORDER BY created_at DESC, user_id DESC
             LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    /// Total number of users.
    pub async fn count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Overwrites a user's balance.
    pub async fn set_point_balance(&self, user_id: UserId, new_balance: i64) -> DbResult<User> {
        validate_point_balance(new_balance)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET point_balance = ?2 WHERE user_id = ?1 RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(new_balance)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("User", user_id))?;

        info!(user_id, new_balance, "Point balance set");
        Ok(user)
    }

    /// Adds earned points to a user's balance.
    pub async fn award_points(&self, user_id: UserId, amount: i64) -> DbResult<User> {
        validate_award_amount(amount)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET point_balance = point_balance + ?2
             WHERE user_id = ?1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("User", user_id))?;

        info!(user_id, amount, balance = user.point_balance, "Points awarded");
        Ok(user)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
