//! # XP Event Repository
//!
//! The append-only XP log. Rows are written inside the grant transaction
//! and never updated; triggers in the schema reject UPDATE and DELETE.

use chrono::NaiveDate;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::DbResult;
use pointlings_core::{NewXpEvent, PointlingId, XpEvent, XpSource};

const EVENT_COLUMNS: &str = "event_id, pointling_id, source, xp_amount, event_ts";

pub(crate) async fn insert_event<'e, E>(executor: E, event: NewXpEvent) -> DbResult<XpEvent>
where
    E: SqliteExecutor<'e>,
{
    let event = sqlx::query_as::<_, XpEvent>(&format!(
        "INSERT INTO xp_events (pointling_id, source, xp_amount, event_ts)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING {EVENT_COLUMNS}"
    ))
    .bind(event.pointling_id)
    .bind(event.source)
    .bind(event.xp_amount)
    .bind(event.event_ts)
    .fetch_one(executor)
    .await?;

    Ok(event)
}

/// Sum of XP from `source` whose timestamp falls on `day` (UTC).
pub(crate) async fn xp_granted_on<'e, E>(
    executor: E,
    pointling_id: PointlingId,
    source: XpSource,
    day: NaiveDate,
) -> DbResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(xp_amount), 0)
        FROM xp_events
        WHERE pointling_id = ?1 AND source = ?2 AND date(event_ts) = ?3
        "#,
    )
    .bind(pointling_id)
    .bind(source)
    .bind(day)
    .fetch_one(executor)
    .await?;

    Ok(total)
}

/// Read access to XP history.
#[derive(Debug, Clone)]
pub struct XpEventRepository {
    pool: SqlitePool,
}

impl XpEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        XpEventRepository { pool }
    }

    /// Most recent events first.
    pub async fn list_for_pointling(
        &self,
        pointling_id: PointlingId,
        limit: i64,
    ) -> DbResult<Vec<XpEvent>> {
        let events = sqlx::query_as::<_, XpEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM xp_events
             WHERE pointling_id = ?1
             ORDER BY event_ts DESC, event_id DESC
             LIMIT ?2"
        ))
        .bind(pointling_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn granted_on(
        &self,
        pointling_id: PointlingId,
        source: XpSource,
        day: NaiveDate,
    ) -> DbResult<i64> {
        xp_granted_on(&self.pool, pointling_id, source, day).await
    }
}
