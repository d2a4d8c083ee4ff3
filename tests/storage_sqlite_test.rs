// ABOUTME: SQLite store tests over a real on-disk database
// ABOUTME: End-to-end depletion and revert, CAS conflicts, persistence across reconnect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use pantry_engine::config::DepletionConfig;
use pantry_engine::engine::PantryDepletionEngine;
use pantry_engine::errors::StoreError;
use pantry_engine::models::{IngredientOutcome, IngredientRequirement, LedgerState};
use pantry_engine::storage::sqlite::SqlitePantryStore;
use pantry_engine::storage::{Database, PantryStore};
use uuid::Uuid;

const TOLERANCE: f64 = 1e-9;

async fn file_backed_store(dir: &tempfile::TempDir) -> SqlitePantryStore {
    common::init_test_logging();
    let url = format!("sqlite:{}/pantry.db", dir.path().display());
    SqlitePantryStore::new(&url).await.unwrap()
}

#[tokio::test]
async fn test_deplete_and_revert_end_to_end_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir).await;
    let user = Uuid::new_v4();

    let older = common::entry_acquired_hours_ago(user, "flour", 500.0, "g", 48);
    let newer = common::entry_acquired_hours_ago(user, "flour", 300.0, "g", 2);
    common::seed_entries(&store, &[older.clone(), newer.clone()]).await;

    let engine = PantryDepletionEngine::new(store.clone(), DepletionConfig::default());
    let report = engine
        .deplete_for_recipe(
            user,
            "bread",
            &[IngredientRequirement::of("flour", 600.0, "g")],
        )
        .await
        .unwrap();

    match &report.ingredients[0].outcome {
        IngredientOutcome::Consumed { records } => {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].entry_id, older.id);
        }
        other => panic!("expected full consumption, got {other:?}"),
    }

    let reverted = engine.revert(user, report.ledger_id).await.unwrap();
    assert_eq!(reverted.state, LedgerState::Reverted);

    let entries = store.pantry_entries(user).await.unwrap();
    let restored_older = entries.iter().find(|e| e.id == older.id).unwrap();
    let restored_newer = entries.iter().find(|e| e.id == newer.id).unwrap();
    assert!((restored_older.quantity - 500.0).abs() < TOLERANCE);
    assert!((restored_newer.quantity - 300.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_cas_conflict_rolls_back_and_reports_concurrent_modification() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir).await;
    let user = Uuid::new_v4();

    let flour = common::entry_acquired_hours_ago(user, "flour", 500.0, "g", 1);
    common::seed_entries(&store, &[flour.clone()]).await;

    let engine = PantryDepletionEngine::new(store.clone(), DepletionConfig::default());
    let report = engine
        .deplete_for_recipe(
            user,
            "bread",
            &[IngredientRequirement::of("flour", 200.0, "g")],
        )
        .await
        .unwrap();

    // Re-committing the same ledger replays records whose quantity_before
    // no longer matches the stored quantity
    let ledger = store
        .ledger_entry(user, report.ledger_id)
        .await
        .unwrap()
        .unwrap();
    let err = store.commit_depletion(&ledger).await.unwrap_err();
    assert!(matches!(err, StoreError::ConcurrentModification { .. }));

    // The failed commit changed nothing
    let entry = store.pantry_entry(user, flour.id).await.unwrap().unwrap();
    assert!((entry.quantity - 300.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_state_survives_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let user = Uuid::new_v4();
    let ledger_id;
    let entry_id;

    {
        let store = file_backed_store(&dir).await;
        let milk = common::entry_acquired_hours_ago(user, "milk", 1000.0, "ml", 3);
        entry_id = milk.id;
        common::seed_entries(&store, &[milk]).await;

        let engine = PantryDepletionEngine::new(store, DepletionConfig::default());
        let report = engine
            .deplete_for_recipe(
                user,
                "porridge",
                &[IngredientRequirement::of("milk", 250.0, "ml")],
            )
            .await
            .unwrap();
        ledger_id = report.ledger_id;
    }

    // Fresh pool over the same file sees the committed state
    let store = file_backed_store(&dir).await;
    let entry = store.pantry_entry(user, entry_id).await.unwrap().unwrap();
    assert!((entry.quantity - 750.0).abs() < TOLERANCE);

    let ledger = store.ledger_entry(user, ledger_id).await.unwrap().unwrap();
    assert_eq!(ledger.state, LedgerState::Active);
    assert_eq!(ledger.records.len(), 1);
    assert!((ledger.records[0].quantity_before - 1000.0).abs() < TOLERANCE);

    // And the revert window still applies across processes
    let reverted = PantryDepletionEngine::new(store.clone(), DepletionConfig::default())
        .revert(user, ledger_id)
        .await
        .unwrap();
    assert_eq!(reverted.state, LedgerState::Reverted);
    let entry = store.pantry_entry(user, entry_id).await.unwrap().unwrap();
    assert!((entry.quantity - 1000.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_expiry_sweep_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_backed_store(&dir).await;
    let user = Uuid::new_v4();

    common::seed_entries(
        &store,
        &[common::entry_acquired_hours_ago(user, "rice", 400.0, "g", 6)],
    )
    .await;

    let engine = PantryDepletionEngine::new(store.clone(), DepletionConfig::default());
    let report = engine
        .deplete_for_recipe(
            user,
            "risotto",
            &[IngredientRequirement::of("rice", 300.0, "g")],
        )
        .await
        .unwrap();

    // Nothing is stale yet
    let swept = store.expire_stale_ledgers(Utc::now()).await.unwrap();
    assert_eq!(swept, 0);

    let swept = store
        .expire_stale_ledgers(report.revertible_until + Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(swept, 1);

    let ledger = store
        .ledger_entry(user, report.ledger_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ledger.state, LedgerState::Expired);
}

#[tokio::test]
async fn test_factory_selects_backend_from_url() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}/pantry.db", dir.path().display());

    let memory = Database::new("memory").await.unwrap();
    assert_eq!(memory.backend_name(), "memory");

    let sqlite = Database::new(&url).await.unwrap();
    assert_eq!(sqlite.backend_name(), "sqlite");

    // The factory still speaks the full store trait
    let user = Uuid::new_v4();
    let entry = common::entry_acquired_hours_ago(user, "salt", 100.0, "g", 1);
    sqlite.insert_pantry_entry(&entry).await.unwrap();
    let entries = sqlite.pantry_entries(user).await.unwrap();
    assert_eq!(entries.len(), 1);

    assert!(Database::new("postgres://nope").await.is_err());
}
