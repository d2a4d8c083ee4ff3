// ABOUTME: Pantry store factory dispatching on the database URL
// ABOUTME: Single Database enum delegating to the in-memory or SQLite backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::memory::MemoryPantryStore;
use super::sqlite::SqlitePantryStore;
use super::{EntryRestore, PantryStore};
use crate::errors::StoreError;
use crate::models::{DepletionLedgerEntry, PantryEntry};

/// Backend-agnostic pantry store selected by URL at startup.
///
/// `memory` (or `memory:`) selects the in-process store; anything starting
/// with `sqlite:` selects SQLite. Callers hold this enum and never branch
/// on the backend themselves.
#[derive(Debug, Clone)]
pub enum Database {
    /// In-process store, no persistence
    Memory(MemoryPantryStore),
    /// SQLite-backed store
    Sqlite(SqlitePantryStore),
}

impl Database {
    /// Connect to the backend named by `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported URL schemes or when the SQLite
    /// connection/migration fails.
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        if database_url == "memory" || database_url.starts_with("memory:") {
            info!("pantry store backend: memory");
            Ok(Self::Memory(MemoryPantryStore::new()))
        } else if database_url.starts_with("sqlite:") {
            info!("pantry store backend: sqlite");
            Ok(Self::Sqlite(SqlitePantryStore::new(database_url).await?))
        } else {
            Err(StoreError::Backend(anyhow!(
                "unsupported database URL: {database_url}"
            )))
        }
    }

    /// Name of the active backend (for logs and health reporting)
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

#[async_trait]
impl PantryStore for Database {
    async fn insert_pantry_entry(&self, entry: &PantryEntry) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.insert_pantry_entry(entry).await,
            Self::Sqlite(store) => store.insert_pantry_entry(entry).await,
        }
    }

    async fn remove_pantry_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove_pantry_entry(user_id, entry_id).await,
            Self::Sqlite(store) => store.remove_pantry_entry(user_id, entry_id).await,
        }
    }

    async fn pantry_entries(&self, user_id: Uuid) -> Result<Vec<PantryEntry>, StoreError> {
        match self {
            Self::Memory(store) => store.pantry_entries(user_id).await,
            Self::Sqlite(store) => store.pantry_entries(user_id).await,
        }
    }

    async fn pantry_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<PantryEntry>, StoreError> {
        match self {
            Self::Memory(store) => store.pantry_entry(user_id, entry_id).await,
            Self::Sqlite(store) => store.pantry_entry(user_id, entry_id).await,
        }
    }

    async fn commit_depletion(&self, ledger: &DepletionLedgerEntry) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.commit_depletion(ledger).await,
            Self::Sqlite(store) => store.commit_depletion(ledger).await,
        }
    }

    async fn ledger_entry(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
    ) -> Result<Option<DepletionLedgerEntry>, StoreError> {
        match self {
            Self::Memory(store) => store.ledger_entry(user_id, ledger_id).await,
            Self::Sqlite(store) => store.ledger_entry(user_id, ledger_id).await,
        }
    }

    async fn commit_revert(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
        restores: &[EntryRestore],
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.commit_revert(user_id, ledger_id, restores).await,
            Self::Sqlite(store) => store.commit_revert(user_id, ledger_id, restores).await,
        }
    }

    async fn expire_stale_ledgers(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        match self {
            Self::Memory(store) => store.expire_stale_ledgers(now).await,
            Self::Sqlite(store) => store.expire_stale_ledgers(now).await,
        }
    }
}
