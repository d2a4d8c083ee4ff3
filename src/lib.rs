// ABOUTME: Main library entry point for the pantry depletion engine
// ABOUTME: FIFO stock consumption with unit conversion, matching, and revertible ledger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

#![deny(unsafe_code)]

//! # Pantry Depletion Engine
//!
//! Consumes pantry stock when a recipe is completed: resolves free-text
//! ingredient names against pantry entries, converts between compatible
//! units, depletes matching stock oldest-first, and records a time-windowed
//! revertible ledger entry for every depletion.
//!
//! ## Architecture
//!
//! The engine is invoked once per recipe-completion event:
//! - **Units**: static unit registry and category-safe conversion
//! - **Matching**: free-text ingredient name resolution with confidence
//! - **Planner**: FIFO consumption planning with partial fulfillment
//! - **Executor**: atomic stock mutation plus ledger capture
//! - **Revert**: windowed, at-most-once undo of a depletion
//! - **Storage**: pluggable pantry store (in-memory, `SQLite`)
//!
//! The HTTP surface, authentication, and stock acquisition flows are
//! external callers and deliberately absent here.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pantry_engine::config::environment::DepletionConfig;
//! use pantry_engine::engine::PantryDepletionEngine;
//! use pantry_engine::storage::factory::Database;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = Database::new("sqlite::memory:").await?;
//! let engine = PantryDepletionEngine::new(store, DepletionConfig::from_env());
//! # Ok(())
//! # }
//! ```

/// Configuration management for the depletion engine
pub mod config;

/// Application constants and configuration defaults
pub mod constants;

/// Batch orchestration: match, plan, execute, report
pub mod engine;

/// Unified error taxonomy for conversion, execution, and revert failures
pub mod errors;

/// Depletion Executor: atomic stock mutation and ledger capture
pub mod executor;

/// Structured logging setup
pub mod logging;

/// Ingredient name matching with tagged match kinds and confidence
pub mod matching;

/// Common data models: pantry entries, requirements, ledger, reports
pub mod models;

/// Depletion Planner: FIFO consumption planning with partial fulfillment
pub mod planner;

/// Revert Manager: windowed, at-most-once undo of a depletion
pub mod revert;

/// Pantry storage abstraction with pluggable backends
pub mod storage;

/// Unit conversion table: categories, aliases, and scale factors
pub mod units;
