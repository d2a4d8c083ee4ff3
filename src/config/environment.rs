// ABOUTME: Environment configuration for the depletion engine
// ABOUTME: Revert window, matching heuristics, and store URL with typed fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::constants::{defaults, env_vars};

/// Runtime configuration for the depletion engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepletionConfig {
    /// Revert window applied to new ledger entries, in minutes
    pub revert_window_minutes: i64,
    /// Whether the low-confidence token-overlap matching heuristic runs
    pub token_overlap_matching: bool,
    /// Pantry store URL (`sqlite:...` or `memory`)
    pub database_url: String,
}

impl Default for DepletionConfig {
    fn default() -> Self {
        Self {
            revert_window_minutes: defaults::REVERT_WINDOW_MINUTES,
            token_overlap_matching: defaults::TOKEN_OVERLAP_MATCHING,
            database_url: defaults::DATABASE_URL.to_owned(),
        }
    }
}

impl DepletionConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable
    #[must_use]
    pub fn from_env() -> Self {
        let revert_window_minutes = parse_env(
            env_vars::REVERT_WINDOW_MINUTES,
            defaults::REVERT_WINDOW_MINUTES,
        );
        let token_overlap_matching = parse_env(
            env_vars::TOKEN_OVERLAP_MATCHING,
            defaults::TOKEN_OVERLAP_MATCHING,
        );
        let database_url =
            env::var(env_vars::DATABASE_URL).unwrap_or_else(|_| defaults::DATABASE_URL.to_owned());

        Self {
            revert_window_minutes,
            token_overlap_matching,
            database_url,
        }
    }

    /// The revert window as a duration
    #[must_use]
    pub fn revert_window(&self) -> Duration {
        Duration::minutes(self.revert_window_minutes)
    }
}

fn parse_env<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(var = name, value = %raw, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}
