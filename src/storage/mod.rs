// ABOUTME: Pantry storage abstraction for the depletion engine
// ABOUTME: Pluggable backends (in-memory, SQLite) behind the PantryStore trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{DepletionLedgerEntry, PantryEntry};

pub mod factory;
pub mod memory;
pub mod sqlite;

pub use factory::Database;
pub use memory::MemoryPantryStore;
pub use sqlite::SqlitePantryStore;

/// Quantity a revert sets a pantry entry back to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryRestore {
    /// Entry to restore
    pub entry_id: Uuid,
    /// Captured pre-depletion quantity, in the entry's unit
    pub quantity: f64,
}

/// Core pantry storage trait.
///
/// The engine requires exactly two guarantees from a backend: atomic
/// read-check-write per pantry entry (the commit methods), and retrieval of
/// entries by user and of ledger entries by id. Both commit paths must
/// serialize concurrent operations touching the same entries; everything
/// else is a plain read.
#[async_trait]
pub trait PantryStore: Send + Sync {
    /// Insert a pantry entry (acquisition flow and test seeding)
    async fn insert_pantry_entry(&self, entry: &PantryEntry) -> Result<(), StoreError>;

    /// Remove a pantry entry outright (external cleanup flow). Depletion
    /// never calls this; entries that reach zero stay as zero records.
    async fn remove_pantry_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError>;

    /// All pantry entries for a user, including zero-quantity records
    async fn pantry_entries(&self, user_id: Uuid) -> Result<Vec<PantryEntry>, StoreError>;

    /// One pantry entry by id, scoped to its owner
    async fn pantry_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<PantryEntry>, StoreError>;

    /// Apply a depletion atomically: decrement every entry named by the
    /// ledger's records (re-checking each captured pre-mutation quantity)
    /// and persist the ledger entry. Any quantity mismatch fails the whole
    /// commit with [`StoreError::ConcurrentModification`] and mutates
    /// nothing.
    async fn commit_depletion(&self, ledger: &DepletionLedgerEntry) -> Result<(), StoreError>;

    /// Ledger entry by id, scoped to its owner
    async fn ledger_entry(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
    ) -> Result<Option<DepletionLedgerEntry>, StoreError>;

    /// Revert a depletion atomically: restore every listed entry to its
    /// captured quantity and transition the ledger entry from `Active` to
    /// `Reverted`. All-or-nothing: a missing entry fails with
    /// [`StoreError::EntryMissing`]; a ledger entry that already left
    /// `Active` fails with [`StoreError::LedgerNotRevertible`]. Neither
    /// failure mutates anything.
    async fn commit_revert(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
        restores: &[EntryRestore],
    ) -> Result<(), StoreError>;

    /// Housekeeping sweep: transition every `Active` ledger entry whose
    /// expiry has passed to `Expired`. Returns the number transitioned.
    async fn expire_stale_ledgers(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}
