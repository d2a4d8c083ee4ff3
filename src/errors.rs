// ABOUTME: Unified error taxonomy for the pantry depletion engine
// ABOUTME: Conversion, storage, execution, and revert error types with propagation policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Error Taxonomy
//!
//! Three layers, three propagation policies:
//!
//! - **Conversion** errors are always recoverable: the planner skips the
//!   offending pantry entry and surfaces the reason per-entry.
//! - **Execution** errors abort only the depletion they occur in; the
//!   caller may retry the whole request.
//! - **Revert** errors are terminal for the ledger entry they concern and
//!   never mutate state.
//!
//! Per-ingredient outcomes (not found, insufficient) are statuses on the
//! report, not errors — a batch never aborts for one bad ingredient.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::units::UnitCategory;

/// Unit conversion failure.
///
/// Recoverable by construction: the planner treats a failed conversion as
/// "skip this candidate entry", never as a batch failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ConversionError {
    /// The unit string does not resolve to any registered unit
    #[error("unknown unit: {unit}")]
    UnknownUnit {
        /// Unit string as supplied by the caller
        unit: String,
    },

    /// Source and target units belong to different categories
    #[error("cannot convert {from} ({from_category}) to {to} ({to_category})")]
    UnitCategoryMismatch {
        /// Source unit
        from: String,
        /// Source unit category
        from_category: UnitCategory,
        /// Target unit
        to: String,
        /// Target unit category
        to_category: UnitCategory,
    },
}

/// Storage backend failure surfaced by a `PantryStore` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// A compare-and-set decrement observed a quantity different from the
    /// one captured at planning time (another depletion interleaved)
    #[error("pantry entry {entry_id} was modified concurrently")]
    ConcurrentModification {
        /// Entry whose quantity no longer matches the captured value
        entry_id: Uuid,
    },

    /// A pantry entry targeted by a commit no longer exists
    #[error("pantry entry {entry_id} not found")]
    EntryMissing {
        /// Missing entry id
        entry_id: Uuid,
    },

    /// A ledger entry targeted by a commit no longer exists
    #[error("ledger entry {ledger_id} not found")]
    LedgerMissing {
        /// Missing ledger id
        ledger_id: Uuid,
    },

    /// The revert commit found the ledger entry no longer `Active` (a
    /// concurrent revert or the expiry sweep won the race)
    #[error("ledger entry {ledger_id} is no longer revertible")]
    LedgerNotRevertible {
        /// Ledger entry that left the `Active` state
        ledger_id: Uuid,
    },

    /// Underlying backend error (connection, SQL, serialization)
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Depletion execution failure.
///
/// Aborts the depletion it occurs in; no ledger entry is persisted and no
/// stock is mutated.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Concurrent depletion touched an entry between planning and commit;
    /// the caller should re-read the pantry and retry the whole request
    #[error("pantry entry {entry_id} was depleted concurrently; retry the request")]
    ConcurrentModification {
        /// Entry that failed its pre-mutation quantity check
        entry_id: Uuid,
    },

    /// Storage failure during the commit
    #[error("depletion commit failed: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for ExecutionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConcurrentModification { entry_id } => {
                Self::ConcurrentModification { entry_id }
            }
            other => Self::Store(other),
        }
    }
}

/// Revert failure. Terminal and non-retryable; a failed revert never
/// performs a partial restoration.
#[derive(Debug, Error)]
pub enum RevertError {
    /// Ledger entry does not exist or belongs to another user
    #[error("ledger entry {ledger_id} not found")]
    NotFound {
        /// Requested ledger id
        ledger_id: Uuid,
    },

    /// Revert window has passed; nothing was mutated
    #[error("revert window for ledger entry {ledger_id} expired at {expired_at}")]
    Expired {
        /// Requested ledger id
        ledger_id: Uuid,
        /// Expiry timestamp that has passed
        expired_at: chrono::DateTime<chrono::Utc>,
    },

    /// Ledger entry was already reverted; reverting is at-most-once
    #[error("ledger entry {ledger_id} was already reverted")]
    AlreadyReverted {
        /// Requested ledger id
        ledger_id: Uuid,
    },

    /// A pantry entry touched by the ledger no longer exists, so the
    /// all-or-nothing restore cannot proceed
    #[error("cannot revert: pantry entry {entry_id} no longer exists")]
    EntryMissing {
        /// Missing restore target
        entry_id: Uuid,
    },

    /// Storage failure during the restore
    #[error("revert commit failed: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for RevertError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EntryMissing { entry_id } => Self::EntryMissing { entry_id },
            StoreError::LedgerMissing { ledger_id } => Self::NotFound { ledger_id },
            // A concurrent revert winning the race is the benign at-most-once
            // outcome, not a crash
            StoreError::LedgerNotRevertible { ledger_id } => Self::AlreadyReverted { ledger_id },
            other => Self::Store(other),
        }
    }
}
