//! # Pointling Repository
//!
//! Pets, their nicknames and appearance. Leveling writes happen through
//! [`SqliteTx`](crate::SqliteTx) inside the XP transaction.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteExecutor, SqlitePool};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::repository::users::fetch_user;
use pointlings_core::validation::validate_nickname;
use pointlings_core::{Look, Pointling, PointlingId, UserId, XpProgress};

const POINTLING_COLUMNS: &str =
    "pointling_id, user_id, nickname, level, current_xp, required_xp, look, created_at";

/// Row shape; `look` is stored as JSON text.
#[derive(Debug, FromRow)]
struct PointlingRow {
    pointling_id: PointlingId,
    user_id: UserId,
    nickname: Option<String>,
    level: i64,
    current_xp: i64,
    required_xp: i64,
    look: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PointlingRow> for Pointling {
    type Error = DbError;

    fn try_from(row: PointlingRow) -> Result<Self, Self::Error> {
        Ok(Pointling {
            pointling_id: row.pointling_id,
            user_id: row.user_id,
            nickname: row.nickname,
            level: row.level,
            current_xp: row.current_xp,
            required_xp: row.required_xp,
            look: serde_json::from_str(&row.look)?,
            created_at: row.created_at,
        })
    }
}

fn into_pointling(row: Option<PointlingRow>) -> DbResult<Option<Pointling>> {
    row.map(Pointling::try_from).transpose()
}

// =============================================================================
// Shared Queries
// =============================================================================

pub(crate) async fn fetch_pointling<'e, E>(
    executor: E,
    pointling_id: PointlingId,
) -> DbResult<Option<Pointling>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, PointlingRow>(&format!(
        "SELECT {POINTLING_COLUMNS} FROM pointlings WHERE pointling_id = ?1"
    ))
    .bind(pointling_id)
    .fetch_optional(executor)
    .await?;

    into_pointling(row)
}

/// No-op write that takes SQLite's write lock and returns the row.
///
/// Issued as the first statement of a transaction, it makes every later
/// read in that transaction current.
pub(crate) async fn lock_pointling<'e, E>(
    executor: E,
    pointling_id: PointlingId,
) -> DbResult<Option<Pointling>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query_as::<_, PointlingRow>(&format!(
        "UPDATE pointlings SET level = level WHERE pointling_id = ?1 RETURNING {POINTLING_COLUMNS}"
    ))
    .bind(pointling_id)
    .fetch_optional(executor)
    .await?;

    into_pointling(row)
}

pub(crate) async fn update_progress<'e, E>(
    executor: E,
    pointling_id: PointlingId,
    progress: XpProgress,
) -> DbResult<()>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        UPDATE pointlings
        SET level = ?2, current_xp = ?3, required_xp = ?4
        WHERE pointling_id = ?1
        "#,
    )
    .bind(pointling_id)
    .bind(progress.level)
    .bind(progress.current_xp)
    .bind(progress.required_xp)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Pointling", pointling_id));
    }

    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for pointlings.
#[derive(Debug, Clone)]
pub struct PointlingRepository {
    pool: SqlitePool,
}

impl PointlingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PointlingRepository { pool }
    }

    /// Creates a level 1 pointling for an existing user.
    pub async fn create(&self, user_id: UserId, nickname: Option<&str>) -> DbResult<Pointling> {
        let nickname = validate_nickname(nickname)?;

        if fetch_user(&self.pool, user_id).await?.is_none() {
            return Err(DbError::not_found("User", user_id));
        }

        let start = XpProgress::initial();
        let row = sqlx::query_as::<_, PointlingRow>(&format!(
            "INSERT INTO pointlings (user_id, nickname, level, current_xp, required_xp, look, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, '{{}}', ?6)
             RETURNING {POINTLING_COLUMNS}"
        ))
        .bind(user_id)
        .bind(nickname)
        .bind(start.level)
        .bind(start.current_xp)
        .bind(start.required_xp)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let pointling = Pointling::try_from(row)?;
        info!(pointling_id = pointling.pointling_id, user_id, "Pointling created");
        Ok(pointling)
    }

    pub async fn get_by_id(&self, pointling_id: PointlingId) -> DbResult<Option<Pointling>> {
        fetch_pointling(&self.pool, pointling_id).await
    }

    /// A user's pointlings, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> DbResult<Vec<Pointling>> {
        let rows = sqlx::query_as::<_, PointlingRow>(&format!(
            "SELECT {POINTLING_COLUMNS} FROM pointlings
             WHERE user_id = ?1
             ORDER BY created_at DESC, pointling_id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Pointling::try_from).collect()
    }

    /// Sets or clears (`None`) the nickname.
    pub async fn update_nickname(
        &self,
        pointling_id: PointlingId,
        nickname: Option<&str>,
    ) -> DbResult<Pointling> {
        let nickname = validate_nickname(nickname)?;

        let row = sqlx::query_as::<_, PointlingRow>(&format!(
            "UPDATE pointlings SET nickname = ?2 WHERE pointling_id = ?1 RETURNING {POINTLING_COLUMNS}"
        ))
        .bind(pointling_id)
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;

        into_pointling(row)?.ok_or_else(|| DbError::not_found("Pointling", pointling_id))
    }

    /// Replaces the appearance map.
    pub async fn update_look(&self, pointling_id: PointlingId, look: &Look) -> DbResult<Pointling> {
        let row = sqlx::query_as::<_, PointlingRow>(&format!(
            "UPDATE pointlings SET look = ?2 WHERE pointling_id = ?1 RETURNING {POINTLING_COLUMNS}"
        ))
        .bind(pointling_id)
        .bind(serde_json::to_string(look)?)
        .fetch_optional(&self.pool)
        .await?;

        into_pointling(row)?.ok_or_else(|| DbError::not_found("Pointling", pointling_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{Database, DbConfig};

    use super::*;

    async fn setup() -> (Database, UserId) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().create_user("Owner", 0).await.unwrap();
        (db, user.user_id)
    }

    #[tokio::test]
    async fn test_create_starts_at_level_one() {
        let (db, user_id) = setup().await;
        let pointling = db.pointlings().create(user_id, Some("Blip")).await.unwrap();

        assert_eq!(pointling.level, 1);
        assert_eq!(pointling.current_xp, 0);
        assert_eq!(pointling.required_xp, 3);
        assert_eq!(pointling.nickname.as_deref(), Some("Blip"));
        assert!(pointling.look.is_empty());
    }

    #[tokio::test]
    async fn test_create_for_missing_user() {
        let (db, _) = setup().await;
        assert!(matches!(
            db.pointlings().create(999, None).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_nickname_and_look_updates() {
        let (db, user_id) = setup().await;
        let repo = db.pointlings();
        let id = repo.create(user_id, None).await.unwrap().pointling_id;

        let renamed = repo.update_nickname(id, Some("Pip")).await.unwrap();
        assert_eq!(renamed.nickname.as_deref(), Some("Pip"));

        let cleared = repo.update_nickname(id, None).await.unwrap();
        assert!(cleared.nickname.is_none());

        assert!(matches!(
            repo.update_nickname(id, Some(&"x".repeat(33))).await,
            Err(DbError::Validation(_))
        ));

        let look = json!({ "color": "teal", "eyes": 2 });
        let look = look.as_object().unwrap().clone();
        let updated = repo.update_look(id, &look).await.unwrap();
        assert_eq!(updated.look["color"], "teal");

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.look, look);

        assert!(matches!(
            repo.update_look(999, &look).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let (db, user_id) = setup().await;
        let other = db.users().create_user("Other", 0).await.unwrap().user_id;
        let repo = db.pointlings();

        let first = repo.create(user_id, None).await.unwrap();
        let second = repo.create(user_id, None).await.unwrap();
        repo.create(other, None).await.unwrap();

        let mine = repo.list_for_user(user_id).await.unwrap();
        let ids: Vec<_> = mine.iter().map(|p| p.pointling_id).collect();
        assert_eq!(ids, vec![second.pointling_id, first.pointling_id]);
    }

    #[tokio::test]
    async fn test_progress_update() {
        let (db, user_id) = setup().await;
        let id = db.pointlings().create(user_id, None).await.unwrap().pointling_id;

        let next = XpProgress::initial().apply(5).progress;
        update_progress(db.pool(), id, next).await.unwrap();

        let locked = lock_pointling(db.pool(), id).await.unwrap().unwrap();
        assert_eq!(locked.level, 2);
        assert_eq!(locked.current_xp, 5);
        assert!(lock_pointling(db.pool(), 999).await.unwrap().is_none());
    }
}
