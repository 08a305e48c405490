// ABOUTME: Integration tests for shopping list generation and the obtain/complete lifecycle
// ABOUTME: Covers range validation, draft edits, atomic completion, and pantry fold-back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use larder::database::Database;
use larder::errors::ErrorCode;
use larder::inventory::InventoryMirror;
use larder::models::{MealType, Unit};
use larder::plan::MealPlanner;
use larder::remote::{FixtureCatalog, RemoteCatalog};
use larder::shopping::ShoppingService;

use common::{inventory_item, recipe_detail};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

struct Harness {
    fixture: Arc<FixtureCatalog>,
    db: Database,
    inventory: Arc<InventoryMirror>,
    service: ShoppingService,
    planner: MealPlanner,
}

async fn harness() -> Harness {
    let fixture = Arc::new(FixtureCatalog::with_recipes(vec![
        recipe_detail(
            1,
            "Pancakes",
            &[(10, "Flour", 200.0, Unit::Grams), (11, "Egg", 2.0, Unit::Count)],
        ),
        recipe_detail(2, "Omelette", &[(11, "Egg", 3.0, Unit::Count)]),
    ]));
    fixture.set_inventory(vec![inventory_item(10, "Flour", 150.0, Unit::Grams)]);

    let remote: Arc<dyn RemoteCatalog> = Arc::clone(&fixture) as Arc<dyn RemoteCatalog>;
    let db = Database::new("sqlite::memory:").await.unwrap();
    let inventory = Arc::new(InventoryMirror::new(Arc::clone(&remote)));
    let service = ShoppingService::new(db.clone(), Arc::clone(&remote), Arc::clone(&inventory));
    let planner = MealPlanner::new(db.clone());
    Harness { fixture, db, inventory, service, planner }
}

async fn plan_week(planner: &MealPlanner) {
    planner.assign_meal(date(9), MealType::Breakfast, 1, "Pancakes").await.unwrap();
    planner.assign_meal(date(9), MealType::Lunch, 2, "Omelette").await.unwrap();
    planner.assign_meal(date(10), MealType::Dinner, 1, "Pancakes").await.unwrap();
}

#[tokio::test]
async fn test_inverted_range_is_rejected_synchronously() {
    let h = harness().await;
    assert!(ShoppingService::has_date_error(date(10), date(5)));
    assert!(!ShoppingService::has_date_error(date(5), date(10)));

    let err = h.service.generate(date(10), date(5)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidDateRange);
    assert_eq!(h.fixture.call_count("resolve_shopping_list"), 0);
}

#[tokio::test]
async fn test_empty_window_produces_an_empty_draft() {
    let h = harness().await;
    let list = h.service.generate(date(1), date(7)).await.unwrap();
    assert!(list.items.is_empty());
    assert!(!list.completed);

    let stored = h.db.load_shopping_list(list.id).await.unwrap().unwrap();
    assert_eq!(stored, list);
}

#[tokio::test]
async fn test_generated_draft_covers_the_planned_deficit() {
    let h = harness().await;
    plan_week(&h.planner).await;

    let list = h.service.generate(date(9), date(15)).await.unwrap();
    assert_eq!(list.start_date, date(9));
    assert_eq!(list.end_date, date(15));

    // pancakes twice, omelette once: 7 eggs missing, 250g of flour missing
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].name, "Egg");
    assert_eq!(list.items[0].quantity, 7.0);
    assert!(!list.items[0].obtained);
    assert_eq!(list.items[1].name, "Flour");
    assert_eq!(list.items[1].quantity, 250.0);

    // meals outside the window do not contribute
    let narrow = h.service.generate(date(10), date(10)).await.unwrap();
    assert_eq!(narrow.items.len(), 2);
    assert_eq!(narrow.items[0].quantity, 2.0);
    assert_eq!(narrow.items[1].quantity, 50.0);
}

#[tokio::test]
async fn test_obtained_toggle_round_trips_through_the_database() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let mut manager = h.service.generate_managed(date(9), date(15)).await.unwrap();
    let list_id = manager.list().id;

    manager.toggle_obtained(11).await.unwrap();
    assert!(manager.list().items[0].obtained);
    assert_eq!(manager.missing_items().len(), 1);
    assert_eq!(manager.obtained_items()[0].name, "Egg");

    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert!(stored.items[0].obtained);

    // toggling an absent ingredient changes nothing
    manager.toggle_obtained(999).await.unwrap();
    assert_eq!(manager.obtained_items().len(), 1);

    manager.mark_all_missing().await.unwrap();
    assert_eq!(manager.missing_items().len(), 2);
    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert!(stored.items.iter().all(|i| !i.obtained));
}

#[tokio::test]
async fn test_deleting_an_item_shrinks_the_draft() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let mut manager = h.service.generate_managed(date(9), date(15)).await.unwrap();
    let list_id = manager.list().id;

    manager.delete_item(10).await.unwrap();
    assert_eq!(manager.list().items.len(), 1);
    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].ingredient_id, 11);
}

#[tokio::test]
async fn test_completion_freezes_the_list_and_folds_back_once() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let mut manager = h.service.generate_managed(date(9), date(15)).await.unwrap();
    let list_id = manager.list().id;
    manager.toggle_obtained(11).await.unwrap();

    manager.complete().await.unwrap();
    assert!(manager.is_completed());
    assert!(manager.list().items.iter().all(|i| i.obtained));
    assert_eq!(h.fixture.call_count("apply_inventory_delta"), 1);

    // persisted atomically: completed and fully obtained
    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert!(stored.completed);
    assert!(stored.items.iter().all(|i| i.obtained));

    // the pantry gained each item's full quantity, and the mirror reloaded
    assert_eq!(h.inventory.quantity_of(10), 400.0);
    assert_eq!(h.inventory.quantity_of(11), 7.0);

    // a second completion and any further edits are silent no-ops
    manager.complete().await.unwrap();
    manager.toggle_obtained(11).await.unwrap();
    manager.delete_item(10).await.unwrap();
    manager.mark_all_missing().await.unwrap();
    assert_eq!(h.fixture.call_count("apply_inventory_delta"), 1);
    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert_eq!(stored.items.len(), 2);
    assert!(stored.items.iter().all(|i| i.obtained));
}

#[tokio::test]
async fn test_failed_fold_back_leaves_an_editable_draft() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let mut manager = h.service.generate_managed(date(9), date(15)).await.unwrap();
    let list_id = manager.list().id;

    h.fixture.fail_on("apply_inventory_delta");
    assert!(manager.complete().await.is_err());
    assert!(!manager.is_completed());
    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert!(!stored.completed);

    // the retry starts from the draft state and succeeds
    h.fixture.clear_failures();
    manager.complete().await.unwrap();
    assert!(manager.is_completed());
    assert_eq!(h.fixture.call_count("apply_inventory_delta"), 2);
}

#[tokio::test]
async fn test_failed_write_leaves_memory_matching_the_database() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let mut manager = h.service.generate_managed(date(9), date(15)).await.unwrap();
    let list_id = manager.list().id;

    // make every item write fail at the database layer
    sqlx::query("ALTER TABLE shopping_list_items RENAME TO shopping_list_items_hidden")
        .execute(h.db.pool())
        .await
        .unwrap();

    assert!(manager.toggle_obtained(11).await.is_err());
    assert!(manager.delete_item(10).await.is_err());
    assert!(manager.mark_all_missing().await.is_err());

    // the in-memory draft did not run ahead of the persisted list
    assert_eq!(manager.list().items.len(), 2);
    assert!(manager.list().items.iter().all(|i| !i.obtained));

    sqlx::query("ALTER TABLE shopping_list_items_hidden RENAME TO shopping_list_items")
        .execute(h.db.pool())
        .await
        .unwrap();
    manager.toggle_obtained(11).await.unwrap();
    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert_eq!(stored, *manager.list());
}

#[tokio::test]
async fn test_retried_completion_folds_back_only_once() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let mut manager = h.service.generate_managed(date(9), date(15)).await.unwrap();
    let list_id = manager.list().id;

    // the pantry fold-back succeeds but the local commit fails
    sqlx::query("ALTER TABLE shopping_lists RENAME TO shopping_lists_hidden")
        .execute(h.db.pool())
        .await
        .unwrap();
    assert!(manager.complete().await.is_err());
    assert!(!manager.is_completed());
    assert_eq!(h.fixture.call_count("apply_inventory_delta"), 1);

    // the retry re-attempts only the commit
    sqlx::query("ALTER TABLE shopping_lists_hidden RENAME TO shopping_lists")
        .execute(h.db.pool())
        .await
        .unwrap();
    manager.complete().await.unwrap();
    assert!(manager.is_completed());
    assert_eq!(h.fixture.call_count("apply_inventory_delta"), 1);
    assert_eq!(h.inventory.quantity_of(11), 7.0);

    let stored = h.db.load_shopping_list(list_id).await.unwrap().unwrap();
    assert!(stored.completed);
    assert!(stored.items.iter().all(|i| i.obtained));
}

#[tokio::test]
async fn test_stored_lists_are_reopened_by_id() {
    let h = harness().await;
    plan_week(&h.planner).await;
    let list = h.service.generate(date(9), date(15)).await.unwrap();

    let manager = h.service.open(list.id).await.unwrap().unwrap();
    assert_eq!(manager.list().id, list.id);
    assert_eq!(manager.list().items.len(), 2);

    let unknown = h.service.open(uuid::Uuid::new_v4()).await.unwrap();
    assert!(unknown.is_none());

    let stored = h.service.stored_lists().await.unwrap();
    assert_eq!(stored.len(), 1);
}
