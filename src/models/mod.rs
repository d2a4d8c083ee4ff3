// ABOUTME: Common data models for the pantry depletion engine
// ABOUTME: Pantry entries, ingredient requirements, depletion ledger, and report types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

/// Depletion ledger entry, consumption records, and ledger state machine
pub mod ledger;

/// Pantry stock records and recipe ingredient requirements
pub mod pantry;

/// Per-ingredient outcomes and the batch depletion report
pub mod report;

pub use ledger::{ConsumptionRecord, DepletionLedgerEntry, LedgerState, RequirementAmount};
pub use pantry::{IngredientRequirement, PantryEntry};
pub use report::{DepletionReport, IngredientOutcome, IngredientReport, SkippedEntry};
