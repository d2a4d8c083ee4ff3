// ABOUTME: Depletion ledger entry and consumption records enabling revert
// ABOUTME: LedgerState is an explicit guarded state machine (Active/Reverted/Expired/Invalidated)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The requirement-side amount a consumption satisfies, recorded when the
/// requirement's unit differed from the entry's unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementAmount {
    /// Amount in the requirement's unit
    pub quantity: f64,
    /// The requirement's unit
    pub unit: String,
}

/// One planned/applied removal from a single pantry entry.
///
/// Quantities are in the entry's own unit; when the requirement used a
/// different unit, `satisfies` carries the converted requirement-side view.
/// `quantity_before` is the pre-mutation quantity captured so revert can
/// restore it exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    /// Pantry entry this removal targets
    pub entry_id: Uuid,
    /// Entry name at planning time (for reporting)
    pub entry_name: String,
    /// Quantity removed, in the entry's unit
    pub quantity_removed: f64,
    /// The entry's unit
    pub unit: String,
    /// Entry quantity before the removal, in the entry's unit
    pub quantity_before: f64,
    /// Requirement-side amount when a unit conversion was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfies: Option<RequirementAmount>,
}

impl ConsumptionRecord {
    /// Entry quantity after the removal
    #[must_use]
    pub fn quantity_after(&self) -> f64 {
        (self.quantity_before - self.quantity_removed).max(0.0)
    }
}

/// Lifecycle of a ledger entry.
///
/// `Active` is the only state a revert may proceed from; every other state
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerState {
    /// Within the revert window and unused
    Active,
    /// Successfully reverted; terminal
    Reverted,
    /// Revert window passed without a revert; terminal
    Expired,
    /// Entry no longer actionable (e.g. ownership mismatch); terminal
    Invalidated,
}

impl LedgerState {
    /// Stable string form used by the storage layer
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Reverted => "reverted",
            Self::Expired => "expired",
            Self::Invalidated => "invalidated",
        }
    }

    /// Parse the storage string form; unknown values map to `Invalidated`
    /// so a corrupt row can never be reverted
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "active" => Self::Active,
            "reverted" => Self::Reverted,
            "expired" => Self::Expired,
            _ => Self::Invalidated,
        }
    }
}

/// The undo unit: a recorded, revertible snapshot of one depletion
/// operation's effects. Created atomically with the pantry mutation and
/// revertible at most once, only before `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepletionLedgerEntry {
    /// Unique ledger id, returned to the caller for later revert
    pub id: Uuid,
    /// Owning user; revert requests for other users see `NotFound`
    pub user_id: Uuid,
    /// Recipe that triggered the depletion
    pub recipe_name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// `created_at` plus the configured revert window
    pub expires_at: DateTime<Utc>,
    /// Current lifecycle state
    pub state: LedgerState,
    /// Ordered removals applied by this depletion, with pre-mutation
    /// quantities captured
    pub records: Vec<ConsumptionRecord>,
}

impl DepletionLedgerEntry {
    /// Create a new active ledger entry expiring after `revert_window`
    #[must_use]
    pub fn new(
        user_id: Uuid,
        recipe_name: impl Into<String>,
        records: Vec<ConsumptionRecord>,
        created_at: DateTime<Utc>,
        revert_window: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            recipe_name: recipe_name.into(),
            created_at,
            expires_at: created_at + revert_window,
            state: LedgerState::Active,
            records,
        }
    }

    /// State as observed at `now`: an `Active` entry past its expiry reads
    /// as `Expired` even before the housekeeping sweep persists it
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> LedgerState {
        if self.state == LedgerState::Active && now > self.expires_at {
            LedgerState::Expired
        } else {
            self.state
        }
    }
}
