//! Postgres-backed command store.
//!
//! Runtime-checked queries against a `commands` table keyed by `id`, with
//! `beaconid` and `status` columns queryable by equality. The claim
//! primitive is a single conditional `UPDATE ... RETURNING`, so the
//! pending→sent sweep is atomic per row without any application-side lock.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use coldwire_core::{BeaconId, CommandId};

use super::command::{Command, CommandStatus};
use super::store::{CommandStore, StoreError};

/// Command store over a sqlx Postgres pool.
///
/// The pool is thread-safe; every operation is a single statement, so no
/// explicit transactions are needed.
pub struct PostgresCommandStore {
    pool: Arc<PgPool>,
}

impl PostgresCommandStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `commands` table and its lookup index if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS commands (
                id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                beaconid BIGINT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(to_store_error)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS commands_beaconid_status_idx \
             ON commands (beaconid, status)",
        )
        .execute(&*self.pool)
        .await
        .map_err(to_store_error)?;

        Ok(())
    }
}

fn to_store_error(err: sqlx::Error) -> StoreError {
    StoreError::backend(err.to_string())
}

fn row_to_command(row: &PgRow) -> Result<Command, StoreError> {
    let id: i64 = row.try_get("id").map_err(to_store_error)?;
    let beaconid: i64 = row.try_get("beaconid").map_err(to_store_error)?;
    let content: String = row.try_get("content").map_err(to_store_error)?;
    let status: String = row.try_get("status").map_err(to_store_error)?;

    let beacon_id = BeaconId::new(beaconid)
        .map_err(|e| StoreError::backend(format!("corrupt beaconid column: {e}")))?;
    let status = CommandStatus::parse(&status)
        .map_err(|e| StoreError::backend(format!("corrupt status column: {e}")))?;

    Ok(Command::from_parts(
        CommandId::from_i64(id),
        beacon_id,
        content,
        status,
    ))
}

#[async_trait]
impl CommandStore for PostgresCommandStore {
    async fn insert(&self, beacon_id: BeaconId, content: String) -> Result<Command, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO commands (beaconid, content, status)
            VALUES ($1, $2, $3)
            RETURNING id, beaconid, content, status
            "#,
        )
        .bind(beacon_id.as_i64())
        .bind(&content)
        .bind(CommandStatus::Pending.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(to_store_error)?;

        row_to_command(&row)
    }

    async fn get(&self, id: CommandId) -> Result<Option<Command>, StoreError> {
        let row = sqlx::query(
            "SELECT id, beaconid, content, status FROM commands WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&*self.pool)
        .await
        .map_err(to_store_error)?;

        row.as_ref().map(row_to_command).transpose()
    }

    async fn find_by_beacon(&self, beacon_id: BeaconId) -> Result<Vec<Command>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, beaconid, content, status FROM commands \
             WHERE beaconid = $1 ORDER BY id",
        )
        .bind(beacon_id.as_i64())
        .fetch_all(&*self.pool)
        .await
        .map_err(to_store_error)?;

        rows.iter().map(row_to_command).collect()
    }

    async fn find_by_beacon_and_status(
        &self,
        beacon_id: BeaconId,
        status: CommandStatus,
    ) -> Result<Vec<Command>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, beaconid, content, status FROM commands \
             WHERE beaconid = $1 AND status = $2 ORDER BY id",
        )
        .bind(beacon_id.as_i64())
        .bind(status.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(to_store_error)?;

        rows.iter().map(row_to_command).collect()
    }

    async fn compare_and_set_status(
        &self,
        id: CommandId,
        expected: CommandStatus,
        next: CommandStatus,
    ) -> Result<Option<Command>, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE commands SET status = $1
            WHERE id = $2 AND status = $3
            RETURNING id, beaconid, content, status
            "#,
        )
        .bind(next.as_str())
        .bind(id.as_i64())
        .bind(expected.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(to_store_error)?;

        row.as_ref().map(row_to_command).transpose()
    }
}
