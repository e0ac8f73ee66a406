use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use hourwatch_core::StatusRecord;
use hourwatch_db::DbError;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("status store unavailable: {0}")]
    Unavailable(String),
}

/// Where cycle results are written. Keyed by `(name, address)`, last write wins.
pub trait StatusStore: Send + Sync {
    fn upsert(&self, record: &StatusRecord) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Postgres-backed store writing to `restaurant_status`.
#[derive(Debug, Clone)]
pub struct PgStatusStore {
    pool: PgPool,
}

impl PgStatusStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl StatusStore for PgStatusStore {
    async fn upsert(&self, record: &StatusRecord) -> Result<(), StoreError> {
        let is_new = hourwatch_db::upsert_status_record(&self.pool, record).await?;
        tracing::debug!(
            location = %record.location_id(),
            is_new,
            "status record upserted"
        );
        Ok(())
    }
}

/// In-process store for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<(String, String), StatusRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, sorted by `(name, address)`.
    #[must_use]
    pub fn records(&self) -> Vec<StatusRecord> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<StatusRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| (a.name(), a.address()).cmp(&(b.name(), b.address())));
        records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StatusStore for MemoryStore {
    async fn upsert(&self, record: &StatusRecord) -> Result<(), StoreError> {
        let key = (record.name().to_owned(), record.address().to_owned());
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, record.clone());
        Ok(())
    }
}
