// ABOUTME: Pantry stock records and recipe ingredient requirements
// ABOUTME: PantryEntry is mutated only by the executor (decrement) and revert manager (restore)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::QUANTITY_EPSILON;

/// One stock record in a user's pantry.
///
/// Created externally by the acquisition flow (purchase/scan). The engine
/// only ever decrements the quantity (depletion) or restores it (revert);
/// entries that reach zero are kept as zero records so a later revert has
/// a target to restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PantryEntry {
    /// Unique identifier for this stock record
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    /// Free-text ingredient name ("all-purpose flour")
    pub name: String,
    /// Remaining quantity, non-negative, in `unit`
    pub quantity: f64,
    /// Unit string; must resolve against the unit registry to be depletable
    pub unit: String,
    /// Acquisition timestamp, drives FIFO ordering
    pub acquired_at: DateTime<Utc>,
}

impl PantryEntry {
    /// Create a new pantry entry with a fresh id
    #[must_use]
    pub fn new(
        user_id: Uuid,
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        acquired_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            quantity,
            unit: unit.into(),
            acquired_at,
        }
    }

    /// Whether the entry holds no usable stock
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.quantity <= QUANTITY_EPSILON
    }
}

/// One line of a recipe's ingredient list.
///
/// An absent quantity means "use all available"; an absent unit means the
/// quantity is taken in each matched entry's own unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRequirement {
    /// Free-text ingredient name
    #[serde(rename = "ingredient_name")]
    pub name: String,
    /// Required quantity; `None` consumes all matching stock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// Unit for `quantity`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl IngredientRequirement {
    /// Requirement for a specific quantity and unit
    #[must_use]
    pub fn of(name: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            unit: Some(unit.into()),
        }
    }

    /// Requirement without an explicit quantity: use all available stock
    #[must_use]
    pub fn all_available(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
        }
    }
}
