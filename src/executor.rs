// ABOUTME: Depletion Executor applying consumption plans to pantry state
// ABOUTME: Atomic decrement with pre-mutation capture into a revertible ledger entry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Depletion Executor
//!
//! Turns a batch of planned consumptions into committed state: every
//! decrement re-checks the quantity captured at planning time (defense
//! against a concurrent depletion of the same entry), and the ledger entry
//! is persisted atomically with the mutation. Until the commit returns,
//! nothing is persisted and abandoning the request is safe; after it, the
//! operation is final and only undoable through the revert manager.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ExecutionError;
use crate::models::{ConsumptionRecord, DepletionLedgerEntry};
use crate::storage::PantryStore;

/// Applies consumption plans against a pantry store
pub struct DepletionExecutor<'a, S: PantryStore> {
    store: &'a S,
}

impl<'a, S: PantryStore> DepletionExecutor<'a, S> {
    /// Executor over `store`
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Commit the planned consumptions for one recipe completion.
    ///
    /// Entries that reach zero stay as zero records; revert needs a target
    /// to restore. An empty record set still produces a ledger entry so
    /// every completion returns a uniform, revertible handle.
    ///
    /// # Errors
    ///
    /// [`ExecutionError::ConcurrentModification`] when another depletion
    /// changed an entry between planning and commit (retry the request);
    /// [`ExecutionError::Store`] for backend failures. Either way no stock
    /// was mutated and no ledger entry exists.
    pub async fn execute(
        &self,
        user_id: Uuid,
        recipe_name: &str,
        records: Vec<ConsumptionRecord>,
        now: DateTime<Utc>,
        revert_window: Duration,
    ) -> Result<DepletionLedgerEntry, ExecutionError> {
        let ledger = DepletionLedgerEntry::new(user_id, recipe_name, records, now, revert_window);

        if let Err(err) = self.store.commit_depletion(&ledger).await {
            warn!(
                %user_id,
                recipe_name,
                error = %err,
                "depletion commit failed"
            );
            return Err(err.into());
        }

        info!(
            %user_id,
            recipe_name,
            ledger_id = %ledger.id,
            records = ledger.records.len(),
            revertible_until = %ledger.expires_at,
            "depletion committed"
        );
        Ok(ledger)
    }
}
