// ABOUTME: Integration tests for catalog store pagination and branch behavior
// ABOUTME: Covers ordering, in-flight guards, end-of-pagination, failures, and filter independence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use larder::catalog::CatalogStore;
use larder::models::{RecipeDraft, RecipeFilter, Unit};
use larder::remote::{FixtureCatalog, RemoteCatalog};

use common::recipe_detail;

fn seeded_fixture(count: i64) -> Arc<FixtureCatalog> {
    Arc::new(FixtureCatalog::with_recipes(
        (1..=count)
            .map(|id| recipe_detail(id, &format!("Recipe {id}"), &[]))
            .collect(),
    ))
}

fn store_over(fixture: &Arc<FixtureCatalog>, per_page: u32) -> CatalogStore {
    let remote: Arc<dyn RemoteCatalog> = Arc::clone(fixture) as Arc<dyn RemoteCatalog>;
    CatalogStore::new(remote, per_page)
}

#[tokio::test]
async fn test_pages_append_in_server_order() {
    let fixture = seeded_fixture(5);
    let store = store_over(&fixture, 2);

    store.load_first_page().await;
    store.load_next_page().await;
    store.load_next_page().await;

    let snapshot = store.browse_snapshot();
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.page, 3);
    assert_eq!(snapshot.total_pages, Some(3));
    assert_eq!(
        snapshot.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
}

#[tokio::test]
async fn test_next_page_is_noop_at_end_of_pagination() {
    let fixture = seeded_fixture(3);
    let store = store_over(&fixture, 2);

    store.load_first_page().await;
    store.load_next_page().await;
    assert_eq!(fixture.call_count("fetch_recipes"), 2);

    // end reached: no request leaves the store
    store.load_next_page().await;
    store.load_next_page().await;
    assert_eq!(fixture.call_count("fetch_recipes"), 2);
    assert_eq!(store.browse_snapshot().items.len(), 3);
}

#[tokio::test]
async fn test_next_page_before_first_page_is_noop() {
    let fixture = seeded_fixture(3);
    let store = store_over(&fixture, 2);

    store.load_next_page().await;
    assert_eq!(fixture.call_count("fetch_recipes"), 0);
    assert!(store.browse_snapshot().items.is_empty());
}

#[tokio::test]
async fn test_overlapping_first_page_loads_fetch_once() {
    let fixture = seeded_fixture(4);
    fixture.set_latency(Some(Duration::from_millis(20)));
    let store = store_over(&fixture, 2);

    // the second load starts while the first is in flight and is refused
    tokio::join!(store.load_first_page(), store.load_first_page());

    assert_eq!(fixture.call_count("fetch_recipes"), 1);
    let snapshot = store.browse_snapshot();
    assert_eq!(snapshot.items.len(), 2);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_overlapping_next_page_loads_fetch_once() {
    let fixture = seeded_fixture(6);
    let store = store_over(&fixture, 2);
    store.load_first_page().await;

    fixture.set_latency(Some(Duration::from_millis(20)));
    tokio::join!(store.load_next_page(), store.load_next_page());

    assert_eq!(fixture.call_count("fetch_recipes"), 2);
    assert_eq!(
        store
            .browse_snapshot()
            .items
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[tokio::test]
async fn test_failed_fetch_keeps_prior_items_and_sets_error() {
    let fixture = seeded_fixture(4);
    let store = store_over(&fixture, 2);
    store.load_first_page().await;
    assert_eq!(store.browse_snapshot().items.len(), 2);

    fixture.fail_on("fetch_recipes");
    store.load_first_page().await;

    let snapshot = store.browse_snapshot();
    assert!(snapshot.error.is_some());
    assert_eq!(snapshot.items.len(), 2, "prior data stays visible");

    // the error clears on the next successful fetch
    fixture.clear_failures();
    store.load_first_page().await;
    assert!(store.browse_snapshot().error.is_none());
}

#[tokio::test]
async fn test_failed_refresh_does_not_duplicate_pages() {
    let fixture = seeded_fixture(6);
    let store = store_over(&fixture, 2);
    store.load_first_page().await;
    store.load_next_page().await;
    assert_eq!(store.browse_snapshot().items.len(), 4);

    // a failed refresh must leave the cursor matching the kept items
    fixture.fail_on("fetch_recipes");
    store.load_first_page().await;
    assert!(store.browse_snapshot().error.is_some());

    fixture.clear_failures();
    store.load_next_page().await;
    assert_eq!(
        store
            .browse_snapshot()
            .items
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6]
    );
}

#[tokio::test]
async fn test_failed_next_page_is_retried_at_the_same_page() {
    let fixture = seeded_fixture(6);
    let store = store_over(&fixture, 2);
    store.load_first_page().await;

    fixture.fail_on("fetch_recipes");
    store.load_next_page().await;
    assert_eq!(store.browse_snapshot().items.len(), 2);

    fixture.clear_failures();
    store.load_next_page().await;
    assert_eq!(
        store
            .browse_snapshot()
            .items
            .iter()
            .map(|r| r.id)
            .collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[tokio::test]
async fn test_failed_next_page_appends_nothing() {
    let fixture = seeded_fixture(6);
    let store = store_over(&fixture, 2);
    store.load_first_page().await;

    fixture.fail_on("fetch_recipes");
    store.load_next_page().await;

    let snapshot = store.browse_snapshot();
    assert!(snapshot.error.is_some());
    assert_eq!(snapshot.items.len(), 2);
}

#[tokio::test]
async fn test_filtered_branch_is_independent_of_browse() {
    let fixture = Arc::new(FixtureCatalog::with_recipes(vec![
        recipe_detail(1, "Lentil Curry", &[]),
        recipe_detail(2, "Pancakes", &[]),
        recipe_detail(3, "Green Curry", &[]),
    ]));
    let store = store_over(&fixture, 10);
    store.load_first_page().await;

    let filter = RecipeFilter { name: Some("curry".into()), ..Default::default() };
    store.apply_filter(filter).await;

    assert!(store.filter_active());
    let filtered = store.filtered_snapshot();
    assert_eq!(
        filtered.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 3]
    );

    // the unfiltered browse list was not touched by the filter
    assert_eq!(store.browse_snapshot().items.len(), 3);
    assert_eq!(fixture.call_count("fetch_recipes"), 1);

    // clearing the filter flips visibility but retains filtered data
    store.clear_filter();
    assert!(!store.filter_active());
    assert_eq!(store.visible_snapshot().items.len(), 3);
    assert_eq!(store.filtered_snapshot().items.len(), 2);
}

#[tokio::test]
async fn test_reapplying_filter_resets_filtered_pagination() {
    let fixture = seeded_fixture(5);
    let store = store_over(&fixture, 2);

    let all = RecipeFilter::default();
    store.apply_filter(all.clone()).await;
    store.load_next_filtered_page().await;
    assert_eq!(store.filtered_snapshot().items.len(), 4);

    store.apply_filter(all).await;
    let snapshot = store.filtered_snapshot();
    assert_eq!(snapshot.page, 1);
    assert_eq!(snapshot.items.len(), 2);
}

#[tokio::test]
async fn test_visible_snapshot_follows_active_filter() {
    let fixture = Arc::new(FixtureCatalog::with_recipes(vec![
        recipe_detail(1, "Soup", &[]),
        recipe_detail(2, "Stew", &[]),
    ]));
    let store = store_over(&fixture, 10);
    store.load_first_page().await;

    store
        .apply_filter(RecipeFilter { name: Some("stew".into()), ..Default::default() })
        .await;
    assert_eq!(store.visible_snapshot().items.len(), 1);

    store.clear_filter();
    assert_eq!(store.visible_snapshot().items.len(), 2);
}

#[tokio::test]
async fn test_create_recipe_reloads_browse_from_scratch() {
    let fixture = seeded_fixture(2);
    let store = store_over(&fixture, 10);
    store.load_first_page().await;

    let draft = RecipeDraft {
        name: "Ribollita".into(),
        description: "Tuscan bread soup".into(),
        prep_time_minutes: 45,
        allergens: BTreeSet::from(["gluten".to_owned()]),
        guide_steps: vec![
            "Soften the vegetables".into(),
            "Simmer with beans".into(),
            "Layer with bread and rest".into(),
        ],
        ingredients: vec![],
    };
    let created = store.create_recipe(&draft).await.unwrap();
    assert_eq!(created.name, "Ribollita");

    let snapshot = store.browse_snapshot();
    assert_eq!(snapshot.items.len(), 3);
    assert!(snapshot.items.iter().any(|r| r.id == created.id));
    assert_eq!(fixture.call_count("fetch_recipes"), 2);
}

#[tokio::test]
async fn test_invalid_draft_is_rejected_before_the_remote_call() {
    let fixture = seeded_fixture(1);
    let store = store_over(&fixture, 10);

    let draft = RecipeDraft {
        name: "Toast".into(),
        description: String::new(),
        prep_time_minutes: 1,
        allergens: BTreeSet::new(),
        guide_steps: vec!["Toast the bread".into()],
        ingredients: vec![],
    };
    assert!(store.create_recipe(&draft).await.is_err());
    assert_eq!(fixture.call_count("create_recipe"), 0);
}

#[tokio::test]
async fn test_delete_recipe_reloads_browse() {
    let fixture = seeded_fixture(3);
    let store = store_over(&fixture, 10);
    store.load_first_page().await;

    store.delete_recipe(2).await.unwrap();
    let snapshot = store.browse_snapshot();
    assert_eq!(
        snapshot.items.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 3]
    );
}

#[tokio::test]
async fn test_recipe_detail_is_fetched_on_demand() {
    let fixture = Arc::new(FixtureCatalog::with_recipes(vec![recipe_detail(
        7,
        "Frittata",
        &[(1, "Egg", 6.0, Unit::Count)],
    )]));
    let store = store_over(&fixture, 10);

    let detail = store.recipe_detail(7).await.unwrap();
    assert_eq!(detail.summary.name, "Frittata");
    assert_eq!(detail.ingredients.len(), 1);
    assert!(store.recipe_detail(99).await.is_err());
}
