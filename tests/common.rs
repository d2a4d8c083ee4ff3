// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Quiet logging setup and pantry seeding helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared test setup for `pantry_engine` integration tests

use chrono::{Duration, Utc};
use pantry_engine::models::PantryEntry;
use pantry_engine::storage::memory::MemoryPantryStore;
use pantry_engine::storage::PantryStore;
use std::sync::Once;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory store with quiet logging
pub fn create_test_store() -> MemoryPantryStore {
    init_test_logging();
    MemoryPantryStore::new()
}

/// Pantry entry acquired `hours_ago` hours before now
pub fn entry_acquired_hours_ago(
    user_id: Uuid,
    name: &str,
    quantity: f64,
    unit: &str,
    hours_ago: i64,
) -> PantryEntry {
    PantryEntry::new(
        user_id,
        name,
        quantity,
        unit,
        Utc::now() - Duration::hours(hours_ago),
    )
}

/// Insert entries into a store
pub async fn seed_entries<S: PantryStore>(store: &S, entries: &[PantryEntry]) {
    for entry in entries {
        store.insert_pantry_entry(entry).await.unwrap();
    }
}
