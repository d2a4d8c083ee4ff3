// ABOUTME: Application constants and configuration defaults
// ABOUTME: Centralizes revert window, matching, and storage defaults with their env var names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

/// Default values used when the environment provides no override
pub mod defaults {
    /// Revert window applied to new ledger entries, in minutes
    pub const REVERT_WINDOW_MINUTES: i64 = 60;

    /// Whether the low-confidence token-overlap matching heuristic is enabled
    pub const TOKEN_OVERLAP_MATCHING: bool = true;

    /// Database URL when none is configured
    pub const DATABASE_URL: &str = "sqlite::memory:";
}

/// Environment variable names read by `DepletionConfig::from_env`
pub mod env_vars {
    /// Overrides the revert window in minutes
    pub const REVERT_WINDOW_MINUTES: &str = "PANTRY_REVERT_WINDOW_MINUTES";

    /// Enables/disables token-overlap matching ("true"/"false")
    pub const TOKEN_OVERLAP_MATCHING: &str = "PANTRY_TOKEN_OVERLAP_MATCHING";

    /// Pantry store URL (`sqlite:...` or `memory`)
    pub const DATABASE_URL: &str = "PANTRY_DATABASE_URL";
}

/// Floating-point tolerance shared by planning and quantity comparisons.
///
/// Planned quantities are derived from unit-scale divisions, so "fully
/// satisfied" and "entry emptied" checks compare within this epsilon
/// rather than against exact zero.
pub const QUANTITY_EPSILON: f64 = 1e-9;
