//! The universe document as one `JSONB` row.
//!
//! The whole [`UniverseState`] is stored in `universe_state.state_json`
//! together with the wall time of the last save. Loads read the row,
//! saves overwrite it; no other table is involved.

use chrono::{DateTime, Utc};
use outpost_core::{StoreError, StoredUniverse, UniverseStore};
use outpost_types::UniverseState;
use sqlx::PgPool;

use crate::error::DbError;

/// A row in the `universe_state` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UniverseRow {
    /// The serialized document.
    pub state_json: serde_json::Value,
    /// Wall time of the last save.
    pub last_update: DateTime<Utc>,
}

/// [`UniverseStore`] backed by a single `universe_state` row.
#[derive(Debug, Clone)]
pub struct PgUniverseStore {
    pool: PgPool,
    row_id: i32,
}

impl PgUniverseStore {
    /// Bind to the row with primary key `row_id`.
    pub const fn new(pool: PgPool, row_id: i32) -> Self {
        Self { pool, row_id }
    }

    /// The row this store reads and writes.
    pub const fn row_id(&self) -> i32 {
        self.row_id
    }

    /// Insert `state` as the document if the row does not exist yet.
    ///
    /// Returns whether a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization or the insert fails.
    pub async fn ensure_row(&self, state: &UniverseState) -> Result<bool, DbError> {
        let document = serde_json::to_value(state)?;
        let result = sqlx::query(
            r"INSERT INTO universe_state (id, state_json, last_update)
              VALUES ($1, $2, now())
              ON CONFLICT (id) DO NOTHING",
        )
        .bind(self.row_id)
        .bind(document)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            tracing::info!(row_id = self.row_id, "Seeded universe row");
        }
        Ok(inserted)
    }

    /// Fetch the raw row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::RowNotFound`] if the row is absent.
    pub async fn fetch_row(&self) -> Result<UniverseRow, DbError> {
        sqlx::query_as::<_, UniverseRow>(
            r"SELECT state_json, last_update FROM universe_state WHERE id = $1",
        )
        .bind(self.row_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::RowNotFound(self.row_id))
    }

    /// Decode the row into a document.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the row is absent or malformed.
    pub async fn load_document(&self) -> Result<StoredUniverse, DbError> {
        let row = self.fetch_row().await?;
        Ok(StoredUniverse {
            state: serde_json::from_value(row.state_json)?,
            last_update: row.last_update,
        })
    }

    /// Overwrite the document and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::RowNotFound`] if no row was updated.
    pub async fn save_document(&self, state: &UniverseState, at: DateTime<Utc>) -> Result<(), DbError> {
        let document = serde_json::to_value(state)?;
        let result = sqlx::query(
            r"UPDATE universe_state SET state_json = $2, last_update = $3 WHERE id = $1",
        )
        .bind(self.row_id)
        .bind(document)
        .bind(at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::RowNotFound(self.row_id));
        }
        tracing::debug!(row_id = self.row_id, sim_time = state.sim_time, "Saved universe row");
        Ok(())
    }
}

impl UniverseStore for PgUniverseStore {
    async fn load(&self) -> Result<StoredUniverse, StoreError> {
        Ok(self.load_document().await?)
    }

    async fn save(&self, state: &UniverseState, at: DateTime<Utc>) -> Result<(), StoreError> {
        Ok(self.save_document(state, at).await?)
    }
}
