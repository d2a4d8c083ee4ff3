// ABOUTME: Per-ingredient outcomes and the batch depletion report
// ABOUTME: Serializes to the response shape the external HTTP layer returns to callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ledger::ConsumptionRecord;
use super::pantry::IngredientRequirement;
use crate::errors::ConversionError;
use crate::matching::IngredientMatch;

/// A matching pantry entry the planner could not use, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// Entry that was skipped
    pub entry_id: Uuid,
    /// Entry name (for rendering)
    pub entry_name: String,
    /// Why the entry was excluded from the plan
    pub reason: ConversionError,
}

/// What happened to one ingredient requirement.
///
/// Every variant is a reportable outcome, not an error: one ingredient's
/// result never aborts the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum IngredientOutcome {
    /// Fully satisfied from pantry stock
    Consumed {
        /// Removals applied, in FIFO order
        records: Vec<ConsumptionRecord>,
    },
    /// Requirement had no explicit quantity; all matching stock consumed
    UsedAllAvailable {
        /// Removals applied, in FIFO order
        records: Vec<ConsumptionRecord>,
    },
    /// Stock ran out before the requirement was satisfied
    PartiallyConsumed {
        /// Removals applied before exhaustion, in FIFO order
        records: Vec<ConsumptionRecord>,
        /// Quantity requested, in the requirement's unit
        needed: f64,
        /// Quantity actually fulfilled, in the requirement's unit
        fulfilled: f64,
        /// Unmet remainder (`needed - fulfilled`), in the requirement's unit
        shortfall: f64,
    },
    /// No pantry entry matched the ingredient name
    NotFound,
}

impl IngredientOutcome {
    /// Removals this outcome applied (empty for `NotFound`)
    #[must_use]
    pub fn records(&self) -> &[ConsumptionRecord] {
        match self {
            Self::Consumed { records }
            | Self::UsedAllAvailable { records }
            | Self::PartiallyConsumed { records, .. } => records,
            Self::NotFound => &[],
        }
    }
}

/// Full result for one requirement line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientReport {
    /// The requirement as submitted
    pub requirement: IngredientRequirement,
    /// Outcome for this requirement
    #[serde(flatten)]
    pub outcome: IngredientOutcome,
    /// Strongest match confidence among the entries that were used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<IngredientMatch>,
    /// Matching entries excluded from the plan, with reasons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEntry>,
}

/// Batch result of one recipe-completion depletion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepletionReport {
    /// Ledger entry id usable for revert within the window
    pub ledger_id: Uuid,
    /// User the depletion ran for
    pub user_id: Uuid,
    /// Recipe that triggered the depletion
    pub recipe_name: String,
    /// When the depletion committed
    pub created_at: DateTime<Utc>,
    /// Deadline for reverting this depletion
    pub revertible_until: DateTime<Utc>,
    /// Per-ingredient outcomes, in submission order
    pub ingredients: Vec<IngredientReport>,
}
