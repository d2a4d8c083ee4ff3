// ABOUTME: SQLite pantry store implementation using sqlx
// ABOUTME: CAS decrements and ledger persistence inside short transactions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

use super::{EntryRestore, PantryStore};
use crate::constants::QUANTITY_EPSILON;
use crate::errors::StoreError;
use crate::models::{ConsumptionRecord, DepletionLedgerEntry, LedgerState, PantryEntry};

/// SQLite-backed pantry store.
///
/// Uuids are stored as TEXT; ledger consumption records are stored as a
/// JSON column (they are only ever read back whole). The commit paths run
/// in transactions, and every decrement re-checks the captured quantity so
/// interleaved depletions fail cleanly instead of going negative.
#[derive(Debug, Clone)]
pub struct SqlitePantryStore {
    pool: SqlitePool,
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.into())
}

impl SqlitePantryStore {
    /// Connect and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema migration fails.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // A pooled in-memory SQLite gives each connection its own database;
        // pin the pool to one connection so state is shared
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await
            .map_err(db_err)?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the pantry and ledger tables.
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS pantry_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                quantity REAL NOT NULL CHECK (quantity >= 0),
                unit TEXT NOT NULL,
                acquired_at DATETIME NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS depletion_ledger (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                recipe_name TEXT NOT NULL,
                created_at DATETIME NOT NULL,
                expires_at DATETIME NOT NULL,
                state TEXT NOT NULL DEFAULT 'active'
                    CHECK (state IN ('active', 'reverted', 'expired', 'invalidated')),
                records TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_pantry_entries_user ON pantry_entries(user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_depletion_ledger_user ON depletion_ledger(user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PantryEntry, StoreError> {
    let id: String = row.try_get("id").map_err(db_err)?;
    let user_id: String = row.try_get("user_id").map_err(db_err)?;
    Ok(PantryEntry {
        id: Uuid::parse_str(&id).map_err(|e| StoreError::Backend(e.into()))?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| StoreError::Backend(e.into()))?,
        name: row.try_get("name").map_err(db_err)?,
        quantity: row.try_get("quantity").map_err(db_err)?,
        unit: row.try_get("unit").map_err(db_err)?,
        acquired_at: row.try_get("acquired_at").map_err(db_err)?,
    })
}

fn ledger_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DepletionLedgerEntry, StoreError> {
    let id: String = row.try_get("id").map_err(db_err)?;
    let user_id: String = row.try_get("user_id").map_err(db_err)?;
    let state: String = row.try_get("state").map_err(db_err)?;
    let records_json: String = row.try_get("records").map_err(db_err)?;
    let records: Vec<ConsumptionRecord> =
        serde_json::from_str(&records_json).map_err(|e| StoreError::Backend(e.into()))?;
    Ok(DepletionLedgerEntry {
        id: Uuid::parse_str(&id).map_err(|e| StoreError::Backend(e.into()))?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| StoreError::Backend(e.into()))?,
        recipe_name: row.try_get("recipe_name").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        expires_at: row.try_get("expires_at").map_err(db_err)?,
        state: LedgerState::from_str_lossy(&state),
        records,
    })
}

#[async_trait]
impl PantryStore for SqlitePantryStore {
    async fn insert_pantry_entry(&self, entry: &PantryEntry) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO pantry_entries (id, user_id, name, quantity, unit, acquired_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(&entry.name)
        .bind(entry.quantity)
        .bind(&entry.unit)
        .bind(entry.acquired_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn remove_pantry_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM pantry_entries WHERE id = ? AND user_id = ?")
            .bind(entry_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn pantry_entries(&self, user_id: Uuid) -> Result<Vec<PantryEntry>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM pantry_entries WHERE user_id = ? ORDER BY acquired_at, id",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn pantry_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<PantryEntry>, StoreError> {
        let row = sqlx::query("SELECT * FROM pantry_entries WHERE id = ? AND user_id = ?")
            .bind(entry_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn commit_depletion(&self, ledger: &DepletionLedgerEntry) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for record in &ledger.records {
            // CAS decrement: only applies if the quantity still matches the
            // value captured at planning time
            let result = sqlx::query(
                r"
                UPDATE pantry_entries
                SET quantity = ?
                WHERE id = ? AND user_id = ? AND ABS(quantity - ?) <= ?
                ",
            )
            .bind(record.quantity_after())
            .bind(record.entry_id.to_string())
            .bind(ledger.user_id.to_string())
            .bind(record.quantity_before)
            .bind(QUANTITY_EPSILON)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            if result.rows_affected() == 0 {
                let exists = sqlx::query("SELECT 1 FROM pantry_entries WHERE id = ?")
                    .bind(record.entry_id.to_string())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_err)?
                    .is_some();
                // Transaction drops here without commit, rolling back any
                // decrements already applied
                return Err(if exists {
                    StoreError::ConcurrentModification {
                        entry_id: record.entry_id,
                    }
                } else {
                    StoreError::EntryMissing {
                        entry_id: record.entry_id,
                    }
                });
            }
        }

        let records_json =
            serde_json::to_string(&ledger.records).map_err(|e| StoreError::Backend(e.into()))?;
        sqlx::query(
            r"
            INSERT INTO depletion_ledger (id, user_id, recipe_name, created_at, expires_at, state, records)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(ledger.id.to_string())
        .bind(ledger.user_id.to_string())
        .bind(&ledger.recipe_name)
        .bind(ledger.created_at)
        .bind(ledger.expires_at)
        .bind(ledger.state.as_str())
        .bind(records_json)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)
    }

    async fn ledger_entry(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
    ) -> Result<Option<DepletionLedgerEntry>, StoreError> {
        let row = sqlx::query("SELECT * FROM depletion_ledger WHERE id = ? AND user_id = ?")
            .bind(ledger_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(ledger_from_row).transpose()
    }

    async fn commit_revert(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
        restores: &[EntryRestore],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Guarded state transition first: only an Active entry may revert
        let result = sqlx::query(
            "UPDATE depletion_ledger SET state = 'reverted' WHERE id = ? AND user_id = ? AND state = 'active'",
        )
        .bind(ledger_id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query("SELECT 1 FROM depletion_ledger WHERE id = ? AND user_id = ?")
                .bind(ledger_id.to_string())
                .bind(user_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?
                .is_some();
            return Err(if exists {
                StoreError::LedgerNotRevertible { ledger_id }
            } else {
                StoreError::LedgerMissing { ledger_id }
            });
        }

        for restore in restores {
            let result = sqlx::query(
                "UPDATE pantry_entries SET quantity = ? WHERE id = ? AND user_id = ?",
            )
            .bind(restore.quantity)
            .bind(restore.entry_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            if result.rows_affected() == 0 {
                // Rollback on drop: the state transition above is undone too
                return Err(StoreError::EntryMissing {
                    entry_id: restore.entry_id,
                });
            }
        }

        tx.commit().await.map_err(db_err)
    }

    async fn expire_stale_ledgers(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE depletion_ledger SET state = 'expired' WHERE state = 'active' AND expires_at < ?",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
