// ABOUTME: In-memory pantry store with per-user mutual exclusion
// ABOUTME: Backs tests and single-process deployments without a database file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{EntryRestore, PantryStore};
use crate::constants::QUANTITY_EPSILON;
use crate::errors::StoreError;
use crate::models::{DepletionLedgerEntry, LedgerState, PantryEntry};

/// One user's pantry and ledger history
#[derive(Debug, Default)]
struct UserShelf {
    entries: HashMap<Uuid, PantryEntry>,
    ledgers: HashMap<Uuid, DepletionLedgerEntry>,
}

/// In-memory store.
///
/// Users are sharded in a concurrent map; each user's shelf sits behind its
/// own async mutex, so concurrent commits for the same user serialize (the
/// read-check-write requirement) while different users proceed in parallel.
#[derive(Debug, Clone, Default)]
pub struct MemoryPantryStore {
    users: Arc<DashMap<Uuid, Arc<Mutex<UserShelf>>>>,
}

impl MemoryPantryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self, user_id: Uuid) -> Arc<Mutex<UserShelf>> {
        self.users.entry(user_id).or_default().clone()
    }
}

#[async_trait]
impl PantryStore for MemoryPantryStore {
    async fn insert_pantry_entry(&self, entry: &PantryEntry) -> Result<(), StoreError> {
        let shelf = self.shelf(entry.user_id);
        let mut shelf = shelf.lock().await;
        shelf.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn remove_pantry_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError> {
        let shelf = self.shelf(user_id);
        let mut shelf = shelf.lock().await;
        shelf.entries.remove(&entry_id);
        Ok(())
    }

    async fn pantry_entries(&self, user_id: Uuid) -> Result<Vec<PantryEntry>, StoreError> {
        let shelf = self.shelf(user_id);
        let shelf = shelf.lock().await;
        let mut entries: Vec<PantryEntry> = shelf.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.acquired_at.cmp(&b.acquired_at).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn pantry_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<PantryEntry>, StoreError> {
        let shelf = self.shelf(user_id);
        let shelf = shelf.lock().await;
        Ok(shelf.entries.get(&entry_id).cloned())
    }

    async fn commit_depletion(&self, ledger: &DepletionLedgerEntry) -> Result<(), StoreError> {
        let shelf = self.shelf(ledger.user_id);
        let mut shelf = shelf.lock().await;

        // Validate every record before mutating anything. Records apply in
        // order, so a ledger may hit the same entry twice; simulate the
        // sequence against scratch quantities and only then write through.
        let mut scratch: HashMap<Uuid, f64> = HashMap::new();
        for record in &ledger.records {
            let entry = shelf
                .entries
                .get(&record.entry_id)
                .ok_or(StoreError::EntryMissing {
                    entry_id: record.entry_id,
                })?;
            let current = scratch
                .get(&record.entry_id)
                .copied()
                .unwrap_or(entry.quantity);
            if (current - record.quantity_before).abs() > QUANTITY_EPSILON {
                return Err(StoreError::ConcurrentModification {
                    entry_id: record.entry_id,
                });
            }
            scratch.insert(record.entry_id, record.quantity_after());
        }

        for (entry_id, quantity) in scratch {
            if let Some(entry) = shelf.entries.get_mut(&entry_id) {
                entry.quantity = quantity;
            }
        }
        shelf.ledgers.insert(ledger.id, ledger.clone());
        Ok(())
    }

    async fn ledger_entry(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
    ) -> Result<Option<DepletionLedgerEntry>, StoreError> {
        let shelf = self.shelf(user_id);
        let shelf = shelf.lock().await;
        Ok(shelf.ledgers.get(&ledger_id).cloned())
    }

    async fn commit_revert(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
        restores: &[EntryRestore],
    ) -> Result<(), StoreError> {
        let shelf = self.shelf(user_id);
        let mut shelf = shelf.lock().await;

        let state = shelf
            .ledgers
            .get(&ledger_id)
            .map(|ledger| ledger.state)
            .ok_or(StoreError::LedgerMissing { ledger_id })?;
        if state != LedgerState::Active {
            return Err(StoreError::LedgerNotRevertible { ledger_id });
        }

        // All-or-nothing: verify every target before restoring any
        for restore in restores {
            if !shelf.entries.contains_key(&restore.entry_id) {
                return Err(StoreError::EntryMissing {
                    entry_id: restore.entry_id,
                });
            }
        }

        for restore in restores {
            if let Some(entry) = shelf.entries.get_mut(&restore.entry_id) {
                entry.quantity = restore.quantity;
            }
        }
        if let Some(ledger) = shelf.ledgers.get_mut(&ledger_id) {
            ledger.state = LedgerState::Reverted;
        }
        Ok(())
    }

    async fn expire_stale_ledgers(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut expired = 0;
        let shelves: Vec<Arc<Mutex<UserShelf>>> =
            self.users.iter().map(|shard| shard.value().clone()).collect();
        for shelf in shelves {
            let mut shelf = shelf.lock().await;
            for ledger in shelf.ledgers.values_mut() {
                if ledger.state == LedgerState::Active && now > ledger.expires_at {
                    ledger.state = LedgerState::Expired;
                    expired += 1;
                }
            }
        }
        Ok(expired)
    }
}
