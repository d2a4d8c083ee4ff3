// ABOUTME: End-to-end depletion engine tests over the in-memory store
// ABOUTME: Batch matching, partial success, ledger creation, and report shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pantry Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use pantry_engine::config::DepletionConfig;
use pantry_engine::engine::PantryDepletionEngine;
use pantry_engine::matching::MatchKind;
use pantry_engine::models::{IngredientOutcome, IngredientRequirement, LedgerState};
use pantry_engine::storage::memory::MemoryPantryStore;
use pantry_engine::storage::PantryStore;
use uuid::Uuid;

const TOLERANCE: f64 = 1e-9;

fn engine_over(store: MemoryPantryStore) -> PantryDepletionEngine<MemoryPantryStore> {
    PantryDepletionEngine::new(store, DepletionConfig::default())
}

#[tokio::test]
async fn test_flour_scenario_end_to_end() {
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    let older = common::entry_acquired_hours_ago(user, "flour", 500.0, "g", 48);
    let newer = common::entry_acquired_hours_ago(user, "flour", 300.0, "g", 2);
    common::seed_entries(&store, &[older.clone(), newer.clone()]).await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "bread",
            &[IngredientRequirement::of("flour", 600.0, "g")],
        )
        .await
        .unwrap();

    assert_eq!(report.ingredients.len(), 1);
    match &report.ingredients[0].outcome {
        IngredientOutcome::Consumed { records } => {
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].entry_id, older.id);
            assert_eq!(records[1].entry_id, newer.id);
        }
        other => panic!("expected full consumption, got {other:?}"),
    }

    // Pantry state: older entry kept as a zero record, newer at 200g
    let entries = engine.store().pantry_entries(user).await.unwrap();
    let older_now = entries.iter().find(|e| e.id == older.id).unwrap();
    let newer_now = entries.iter().find(|e| e.id == newer.id).unwrap();
    assert!(older_now.quantity.abs() < TOLERANCE);
    assert!((newer_now.quantity - 200.0).abs() < TOLERANCE);

    // Ledger is persisted, active, and captures pre-mutation quantities
    let ledger = engine
        .store()
        .ledger_entry(user, report.ledger_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ledger.state, LedgerState::Active);
    assert!((ledger.records[0].quantity_before - 500.0).abs() < TOLERANCE);
    assert!((ledger.records[1].quantity_before - 300.0).abs() < TOLERANCE);
}

#[tokio::test]
async fn test_missing_ingredient_does_not_abort_batch() {
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    common::seed_entries(
        &store,
        &[common::entry_acquired_hours_ago(user, "milk", 500.0, "ml", 4)],
    )
    .await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "omelette",
            &[
                IngredientRequirement::of("eggs", 3.0, "each"),
                IngredientRequirement::of("milk", 2.0, "cups"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.ingredients.len(), 2);
    assert!(matches!(
        report.ingredients[0].outcome,
        IngredientOutcome::NotFound
    ));
    assert!(report.ingredients[0].matched.is_none());

    // The milk line is still processed, with the cup -> ml conversion applied
    match &report.ingredients[1].outcome {
        IngredientOutcome::Consumed { records } => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].unit, "ml");
            assert!((records[0].quantity_removed - 473.176_473).abs() < 1e-6);
        }
        other => panic!("expected consumption, got {other:?}"),
    }
}

#[tokio::test]
async fn test_use_all_available_basil() {
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    common::seed_entries(
        &store,
        &[
            common::entry_acquired_hours_ago(user, "basil", 1.0, "bunch", 24),
            common::entry_acquired_hours_ago(user, "fresh basil", 2.0, "bunch", 2),
        ],
    )
    .await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "pesto",
            &[IngredientRequirement::all_available("basil")],
        )
        .await
        .unwrap();

    match &report.ingredients[0].outcome {
        IngredientOutcome::UsedAllAvailable { records } => assert_eq!(records.len(), 2),
        other => panic!("expected used-all-available, got {other:?}"),
    }

    let entries = engine.store().pantry_entries(user).await.unwrap();
    assert!(entries.iter().all(|e| e.quantity.abs() < TOLERANCE));
}

#[tokio::test]
async fn test_substring_match_is_reported() {
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    common::seed_entries(
        &store,
        &[common::entry_acquired_hours_ago(
            user,
            "cherry tomatoes",
            10.0,
            "each",
            1,
        )],
    )
    .await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "salad",
            &[IngredientRequirement::of("tomato", 4.0, "each")],
        )
        .await
        .unwrap();

    let matched = report.ingredients[0].matched.unwrap();
    assert_eq!(matched.kind, MatchKind::Substring);
    assert!(matches!(
        report.ingredients[0].outcome,
        IngredientOutcome::Consumed { .. }
    ));
}

#[tokio::test]
async fn test_repeated_ingredient_lines_share_stock() {
    // Two lines drawing on the same entry: the second must plan against
    // what the first left behind, and the combined commit must succeed
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    let butter = common::entry_acquired_hours_ago(user, "butter", 250.0, "g", 8);
    common::seed_entries(&store, &[butter.clone()]).await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "croissants",
            &[
                IngredientRequirement::of("butter", 200.0, "g"),
                IngredientRequirement::of("butter", 100.0, "g"),
            ],
        )
        .await
        .unwrap();

    assert!(matches!(
        report.ingredients[0].outcome,
        IngredientOutcome::Consumed { .. }
    ));
    match &report.ingredients[1].outcome {
        IngredientOutcome::PartiallyConsumed {
            fulfilled,
            shortfall,
            ..
        } => {
            assert!((fulfilled - 50.0).abs() < TOLERANCE);
            assert!((shortfall - 50.0).abs() < TOLERANCE);
        }
        other => panic!("expected partial consumption, got {other:?}"),
    }

    let entries = engine.store().pantry_entries(user).await.unwrap();
    assert!(entries[0].quantity.abs() < TOLERANCE);
}

#[tokio::test]
async fn test_insufficient_stock_reports_needed_and_had() {
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    common::seed_entries(
        &store,
        &[common::entry_acquired_hours_ago(user, "sugar", 100.0, "g", 1)],
    )
    .await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "jam",
            &[IngredientRequirement::of("sugar", 250.0, "g")],
        )
        .await
        .unwrap();

    match &report.ingredients[0].outcome {
        IngredientOutcome::PartiallyConsumed {
            needed, fulfilled, ..
        } => {
            assert!((needed - 250.0).abs() < TOLERANCE);
            assert!((fulfilled - 100.0).abs() < TOLERANCE);
        }
        other => panic!("expected partial consumption, got {other:?}"),
    }
}

#[tokio::test]
async fn test_report_serializes_for_the_http_layer() {
    let store = common::create_test_store();
    let user = Uuid::new_v4();
    common::seed_entries(
        &store,
        &[common::entry_acquired_hours_ago(user, "milk", 500.0, "ml", 1)],
    )
    .await;

    let engine = engine_over(store);
    let report = engine
        .deplete_for_recipe(
            user,
            "porridge",
            &[
                IngredientRequirement::of("milk", 1.0, "cup"),
                IngredientRequirement::of("saffron", 1.0, "g"),
            ],
        )
        .await
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["recipe_name"], "porridge");
    assert_eq!(json["ingredients"][0]["status"], "consumed");
    assert_eq!(json["ingredients"][1]["status"], "not_found");
    assert!(json["ledger_id"].is_string());
}
