//! Database operations for the `restaurant_status` table.

use chrono::{DateTime, Utc};
use hourwatch_core::StatusRecord;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `restaurant_status` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusRecordRow {
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "id")]
    pub public_id: Uuid,
    pub location_id: String,
    pub name: String,
    pub address: String,
    pub opening_hours: Option<String>,
    pub expected: bool,
    pub actual: bool,
    pub mismatch: bool,
    pub url: String,
    pub last_checked_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate counts across every stored listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StatusSummaryRow {
    pub total: i64,
    pub open: i64,
    pub mismatched: i64,
    pub last_checked_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert or overwrite the row for the record's `(name, address)`.
///
/// Returns `true` when a new row was inserted and `false` when an existing
/// row was updated. The last write wins; no history is kept.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_status_record(pool: &PgPool, record: &StatusRecord) -> Result<bool, DbError> {
    let is_new = sqlx::query_scalar::<_, bool>(
        "INSERT INTO restaurant_status \
             (location_id, name, address, opening_hours, expected, actual, mismatch, url, \
              last_checked_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (name, address) DO UPDATE SET \
             location_id     = EXCLUDED.location_id, \
             opening_hours   = EXCLUDED.opening_hours, \
             expected        = EXCLUDED.expected, \
             actual          = EXCLUDED.actual, \
             mismatch        = EXCLUDED.mismatch, \
             url             = EXCLUDED.url, \
             last_checked_at = EXCLUDED.last_checked_at, \
             updated_at      = NOW() \
         RETURNING (xmax = 0) AS is_new",
    )
    .bind(record.location_id())
    .bind(record.name())
    .bind(record.address())
    .bind(record.hours_raw())
    .bind(record.expected())
    .bind(record.actual())
    .bind(record.mismatch())
    .bind(record.source_url())
    .bind(record.observed_at())
    .fetch_one(pool)
    .await?;

    Ok(is_new)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns every stored listing, most recently checked first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_status_records(pool: &PgPool) -> Result<Vec<StatusRecordRow>, DbError> {
    let rows = sqlx::query_as::<_, StatusRecordRow>(
        "SELECT id, public_id, location_id, name, address, opening_hours, expected, actual, \
                mismatch, url, last_checked_at, created_at, updated_at \
         FROM restaurant_status \
         ORDER BY last_checked_at DESC, name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns the stored row for one `(name, address)` pair.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matches, or [`DbError::Sqlx`] if
/// the query fails.
pub async fn get_status_record(
    pool: &PgPool,
    name: &str,
    address: &str,
) -> Result<StatusRecordRow, DbError> {
    sqlx::query_as::<_, StatusRecordRow>(
        "SELECT id, public_id, location_id, name, address, opening_hours, expected, actual, \
                mismatch, url, last_checked_at, created_at, updated_at \
         FROM restaurant_status \
         WHERE name = $1 AND address = $2",
    )
    .bind(name)
    .bind(address)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Returns totals for the dashboard header.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn status_summary(pool: &PgPool) -> Result<StatusSummaryRow, DbError> {
    let row = sqlx::query_as::<_, StatusSummaryRow>(
        "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE actual) AS open, \
                COUNT(*) FILTER (WHERE mismatch) AS mismatched, \
                MAX(last_checked_at) AS last_checked_at \
         FROM restaurant_status",
    )
    .fetch_one(pool)
    .await?;

    Ok(row)
}
