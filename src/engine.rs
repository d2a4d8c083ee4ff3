// ABOUTME: Batch orchestration for recipe-completion depletion requests
// ABOUTME: Match each requirement, plan FIFO consumption, execute once, assemble the report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Pantry Depletion Engine
//!
//! One engine call per recipe-completion event: the user's pantry is read
//! once, every requirement is matched and planned against working copies
//! (so two requirements drawing on the same entry see each other's draws),
//! and the combined plan commits through the executor as a single ledger
//! entry. Per-ingredient failures are outcomes on the report; only
//! execution-layer failures abort the request.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::DepletionConfig;
use crate::errors::{ExecutionError, RevertError, StoreError};
use crate::executor::DepletionExecutor;
use crate::matching::{self, IngredientMatch};
use crate::models::{
    ConsumptionRecord, DepletionLedgerEntry, DepletionReport, IngredientOutcome, IngredientReport,
    IngredientRequirement, PantryEntry,
};
use crate::planner;
use crate::revert::RevertManager;
use crate::storage::PantryStore;

/// The pantry depletion engine: store handle plus configuration
pub struct PantryDepletionEngine<S: PantryStore> {
    store: S,
    config: DepletionConfig,
}

impl<S: PantryStore> PantryDepletionEngine<S> {
    /// Engine over `store` with the given configuration
    #[must_use]
    pub const fn new(store: S, config: DepletionConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store (seeding, host integration)
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &DepletionConfig {
        &self.config
    }

    /// Deplete pantry stock for one completed recipe.
    ///
    /// Returns a per-ingredient report plus a ledger id usable for revert
    /// within the configured window. Unmatched or insufficient ingredients
    /// are outcomes, never request failures.
    ///
    /// # Errors
    ///
    /// Only execution-layer failures: [`ExecutionError::ConcurrentModification`]
    /// (safe to retry the whole request) or a backend failure. Neither
    /// leaves partial state behind.
    pub async fn deplete_for_recipe(
        &self,
        user_id: Uuid,
        recipe_name: &str,
        requirements: &[IngredientRequirement],
    ) -> Result<DepletionReport, ExecutionError> {
        info!(
            %user_id,
            recipe_name,
            requirements = requirements.len(),
            "depleting pantry for recipe completion"
        );

        // Working copies: consecutive requirements drawing on the same
        // entry must plan against quantities the earlier draws left behind
        let mut working: Vec<PantryEntry> = self.store.pantry_entries(user_id).await?;
        let mut all_records: Vec<ConsumptionRecord> = Vec::new();
        let mut ingredients: Vec<IngredientReport> = Vec::new();

        for requirement in requirements {
            let matched: Vec<(usize, IngredientMatch)> = working
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    matching::match_names(
                        &requirement.name,
                        &entry.name,
                        self.config.token_overlap_matching,
                    )
                    .map(|found| (index, found))
                })
                .collect();

            if matched.is_empty() {
                debug!(ingredient = %requirement.name, "no matching pantry entry");
                ingredients.push(IngredientReport {
                    requirement: requirement.clone(),
                    outcome: IngredientOutcome::NotFound,
                    matched: None,
                    skipped: Vec::new(),
                });
                continue;
            }

            let best = matched
                .iter()
                .map(|(_, found)| *found)
                .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
            let candidates: Vec<PantryEntry> = matched
                .iter()
                .map(|(index, _)| working[*index].clone())
                .collect();

            let plan = planner::plan(requirement, &candidates);
            for record in &plan.records {
                if let Some(entry) = working.iter_mut().find(|e| e.id == record.entry_id) {
                    entry.quantity = record.quantity_after();
                }
            }
            all_records.extend(plan.records.iter().cloned());

            let skipped = plan.skipped.clone();
            ingredients.push(IngredientReport {
                requirement: requirement.clone(),
                matched: best,
                skipped,
                outcome: plan.outcome(),
            });
        }

        let ledger = DepletionExecutor::new(&self.store)
            .execute(
                user_id,
                recipe_name,
                all_records,
                Utc::now(),
                self.config.revert_window(),
            )
            .await?;

        Ok(DepletionReport {
            ledger_id: ledger.id,
            user_id,
            recipe_name: recipe_name.to_owned(),
            created_at: ledger.created_at,
            revertible_until: ledger.expires_at,
            ingredients,
        })
    }

    /// Revert a previous depletion by ledger id.
    ///
    /// # Errors
    ///
    /// See [`RevertManager::revert`]; failures never partially restore.
    pub async fn revert(
        &self,
        user_id: Uuid,
        ledger_id: Uuid,
    ) -> Result<DepletionLedgerEntry, RevertError> {
        RevertManager::new(&self.store)
            .revert(user_id, ledger_id, Utc::now())
            .await
    }

    /// Housekeeping: mark every active ledger entry past its expiry as
    /// `Expired`. Intended for an external scheduler.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn expire_stale_ledgers(&self) -> Result<u64, StoreError> {
        self.store.expire_stale_ledgers(Utc::now()).await
    }
}
