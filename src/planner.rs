// ABOUTME: Depletion Planner computing FIFO consumption plans for one requirement
// ABOUTME: Oldest stock first, unit conversion per entry, partial fulfillment on exhaustion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

//! # Depletion Planner
//!
//! Given one ingredient requirement and the pantry entries that matched it,
//! computes which entries to draw from and how much. Entries are walked in
//! FIFO order (earliest `acquired_at` first, ties broken by id); each step
//! consumes `min(remaining required, entry quantity)`.
//!
//! Insufficient stock is partial fulfillment, not an error. An entry whose
//! unit cannot be converted to the requirement's unit is skipped and the
//! reason surfaced per-entry, so the caller sees why an apparently-matching
//! entry went unused.

use tracing::debug;

use crate::constants::QUANTITY_EPSILON;
use crate::models::{
    ConsumptionRecord, IngredientOutcome, IngredientRequirement, PantryEntry, RequirementAmount,
    SkippedEntry,
};
use crate::units;

/// Consumption plan for a single requirement, before execution
#[derive(Debug, Clone, Default)]
pub struct DepletionPlan {
    /// Removals to apply, in FIFO order, quantities in each entry's unit
    pub records: Vec<ConsumptionRecord>,
    /// Matched entries excluded from the plan, with conversion failures
    pub skipped: Vec<SkippedEntry>,
    /// Requirement had no explicit quantity and consumed everything matched
    pub used_all: bool,
    /// Required quantity in the requirement's unit, when explicit
    pub needed: Option<f64>,
    /// Quantity satisfied so far, in the requirement's unit
    pub fulfilled: f64,
    /// Unmet remainder in the requirement's unit; zero when satisfied
    pub shortfall: f64,
}

impl DepletionPlan {
    /// Collapse the plan into the per-ingredient outcome for the report
    #[must_use]
    pub fn outcome(self) -> IngredientOutcome {
        if self.used_all {
            IngredientOutcome::UsedAllAvailable {
                records: self.records,
            }
        } else if self.shortfall <= QUANTITY_EPSILON {
            IngredientOutcome::Consumed {
                records: self.records,
            }
        } else {
            IngredientOutcome::PartiallyConsumed {
                records: self.records,
                needed: self.needed.unwrap_or(0.0),
                fulfilled: self.fulfilled,
                shortfall: self.shortfall,
            }
        }
    }
}

/// Plan FIFO consumption of `entries` to satisfy `requirement`.
///
/// `entries` need not be sorted; the planner orders them by `acquired_at`
/// ascending with id as a deterministic tiebreak. Zero-quantity entries are
/// passed over silently (nothing to draw).
#[must_use]
pub fn plan(requirement: &IngredientRequirement, entries: &[PantryEntry]) -> DepletionPlan {
    let mut ordered: Vec<&PantryEntry> = entries
        .iter()
        .filter(|entry| !entry.is_depleted())
        .collect();
    ordered.sort_by(|a, b| {
        a.acquired_at
            .cmp(&b.acquired_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    match requirement.quantity {
        None => plan_use_all(&ordered),
        Some(needed) => plan_quantity(requirement, needed, &ordered),
    }
}

/// No explicit quantity: consume 100% of every matched entry
fn plan_use_all(ordered: &[&PantryEntry]) -> DepletionPlan {
    let records = ordered
        .iter()
        .map(|entry| ConsumptionRecord {
            entry_id: entry.id,
            entry_name: entry.name.clone(),
            quantity_removed: entry.quantity,
            unit: entry.unit.clone(),
            quantity_before: entry.quantity,
            satisfies: None,
        })
        .collect();

    DepletionPlan {
        records,
        used_all: true,
        ..DepletionPlan::default()
    }
}

fn plan_quantity(
    requirement: &IngredientRequirement,
    needed: f64,
    ordered: &[&PantryEntry],
) -> DepletionPlan {
    let mut plan = DepletionPlan {
        needed: Some(needed),
        ..DepletionPlan::default()
    };
    let mut remaining = needed;

    for entry in ordered {
        if remaining <= QUANTITY_EPSILON {
            break;
        }

        // How much of the remainder this entry would have to hold, in the
        // entry's own unit. A requirement without a unit is taken in each
        // entry's unit directly, so no conversion applies.
        let (needed_in_entry_unit, converted) = match requirement.unit.as_deref() {
            Some(req_unit) if !units_equivalent(req_unit, &entry.unit) => {
                match units::convert(remaining, req_unit, &entry.unit) {
                    Ok(value) => (value, true),
                    Err(reason) => {
                        debug!(
                            entry_id = %entry.id,
                            entry_unit = %entry.unit,
                            requirement_unit = %req_unit,
                            %reason,
                            "skipping pantry entry: conversion failed"
                        );
                        plan.skipped.push(SkippedEntry {
                            entry_id: entry.id,
                            entry_name: entry.name.clone(),
                            reason,
                        });
                        continue;
                    }
                }
            }
            _ => (remaining, false),
        };

        let take = needed_in_entry_unit.min(entry.quantity);
        if take <= QUANTITY_EPSILON {
            continue;
        }

        // Back-convert what this removal satisfies in requirement units.
        // The forward conversion succeeded, so the reverse cannot fail.
        let satisfied = if converted {
            requirement
                .unit
                .as_deref()
                .and_then(|req_unit| units::convert(take, &entry.unit, req_unit).ok())
                .unwrap_or(take)
        } else {
            take
        };

        plan.records.push(ConsumptionRecord {
            entry_id: entry.id,
            entry_name: entry.name.clone(),
            quantity_removed: take,
            unit: entry.unit.clone(),
            quantity_before: entry.quantity,
            satisfies: if converted {
                requirement.unit.as_deref().map(|req_unit| RequirementAmount {
                    quantity: satisfied,
                    unit: req_unit.to_owned(),
                })
            } else {
                None
            },
        });

        remaining -= satisfied;
    }

    plan.shortfall = remaining.max(0.0);
    plan.fulfilled = needed - plan.shortfall;
    plan
}

/// Two unit strings that denote the same unit need no conversion, even if
/// neither resolves against the registry (entries and requirements written
/// with the same ad hoc unit still deplete).
fn units_equivalent(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    if a.eq_ignore_ascii_case(b) {
        return true;
    }
    match (units::resolve_unit(a), units::resolve_unit(b)) {
        (Ok(left), Ok(right)) => left.canonical == right.canonical,
        _ => false,
    }
}
