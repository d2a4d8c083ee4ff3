// ABOUTME: Revert Manager undoing a depletion within its time window
// ABOUTME: Guarded Active -> Reverted transition, all-or-nothing quantity restore
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Revert Manager
//!
//! A ledger entry moves `Active -> Reverted` exactly once, and only while
//! `now <= expires_at`. Every other path is a terminal, mutation-free
//! failure: `NotFound` (missing or wrong user), `Expired`, or
//! `AlreadyReverted`. The restore itself is all-or-nothing; if any touched
//! pantry entry has since been deleted, nothing is restored.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::RevertError;
use crate::models::{DepletionLedgerEntry, LedgerState};
use crate::storage::{EntryRestore, PantryStore};

/// Reverts committed depletions against a pantry store
pub struct RevertManager<'a, S: PantryStore> {
    store: &'a S,
}

impl<'a, S: PantryStore> RevertManager<'a, S> {
    /// Revert manager over `store`
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Undo the depletion recorded by `ledger_id`, restoring every touched
    /// pantry entry to its captured pre-depletion quantity.
    ///
    /// Returns the ledger entry in its `Reverted` state. A concurrent
    /// revert of the same entry loses the race benignly with
    /// [`RevertError::AlreadyReverted`].
    ///
    /// # Errors
    ///
    /// [`RevertError::NotFound`], [`RevertError::Expired`],
    /// [`RevertError::AlreadyReverted`], [`RevertError::EntryMissing`], or
    /// [`RevertError::Store`]. No failure performs a partial restoration.
    pub async fn revert(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DepletionLedgerEntry, RevertError> {
        let mut ledger = self
            .store
            .ledger_entry(user_id, ledger_id)
            .await?
            .ok_or(RevertError::NotFound { ledger_id })?;

        match ledger.state_at(now) {
            LedgerState::Active => {}
            LedgerState::Reverted => return Err(RevertError::AlreadyReverted { ledger_id }),
            LedgerState::Expired => {
                return Err(RevertError::Expired {
                    ledger_id,
                    expired_at: ledger.expires_at,
                })
            }
            LedgerState::Invalidated => return Err(RevertError::NotFound { ledger_id }),
        }

        let restores: Vec<EntryRestore> = ledger
            .records
            .iter()
            .map(|record| EntryRestore {
                entry_id: record.entry_id,
                quantity: record.quantity_before,
            })
            .collect();

        self.store
            .commit_revert(user_id, ledger_id, &restores)
            .await?;
        ledger.state = LedgerState::Reverted;

        info!(
            %user_id,
            %ledger_id,
            restored_entries = restores.len(),
            "depletion reverted"
        );
        Ok(ledger)
    }
}
