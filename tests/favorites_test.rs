// ABOUTME: Integration tests for optimistic and strict favorite toggles
// ABOUTME: Covers visibility no-ops, paired flag/count flips, rollback, and derived list refresh
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

mod common;

use std::sync::Arc;

use larder::catalog::{CatalogStore, FavoriteReconciler};
use larder::models::RecipeFilter;
use larder::remote::{FixtureCatalog, RemoteCatalog};

use common::recipe_detail;

fn setup(count: i64) -> (Arc<FixtureCatalog>, Arc<CatalogStore>, FavoriteReconciler) {
    let fixture = Arc::new(FixtureCatalog::with_recipes(
        (1..=count)
            .map(|id| recipe_detail(id, &format!("Recipe {id}"), &[]))
            .collect(),
    ));
    let remote: Arc<dyn RemoteCatalog> = Arc::clone(&fixture) as Arc<dyn RemoteCatalog>;
    let store = Arc::new(CatalogStore::new(remote, 10));
    let reconciler = FavoriteReconciler::new(Arc::clone(&store));
    (fixture, store, reconciler)
}

#[tokio::test]
async fn test_toggle_of_invisible_recipe_is_a_noop() {
    let (fixture, store, reconciler) = setup(2);
    store.load_first_page().await;

    reconciler.toggle_optimistic(99).await.unwrap();
    assert_eq!(fixture.call_count("add_favorite"), 0);
    assert_eq!(fixture.call_count("remove_favorite"), 0);
}

#[tokio::test]
async fn test_optimistic_toggle_flips_flag_and_count_together() {
    let (fixture, store, reconciler) = setup(2);
    store.load_first_page().await;

    reconciler.toggle_optimistic(1).await.unwrap();
    let recipe = store.find_visible(1).unwrap();
    assert!(recipe.is_favorite);
    assert_eq!(recipe.favorite_count, 1);
    assert_eq!(fixture.call_count("add_favorite"), 1);

    // derived lists were re-fetched after the confirmed toggle
    let favorites = store.favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, 1);

    // toggling back removes the favorite
    reconciler.toggle_optimistic(1).await.unwrap();
    let recipe = store.find_visible(1).unwrap();
    assert!(!recipe.is_favorite);
    assert_eq!(recipe.favorite_count, 0);
    assert_eq!(fixture.call_count("remove_favorite"), 1);
    assert!(store.favorites().is_empty());
}

#[tokio::test]
async fn test_failed_toggle_reverts_the_optimistic_edit() {
    let (fixture, store, reconciler) = setup(2);
    store.load_first_page().await;

    fixture.fail_on("add_favorite");
    let result = reconciler.toggle_optimistic(1).await;
    assert!(result.is_err());

    // the flip was rolled back, local state matches remote truth
    let recipe = store.find_visible(1).unwrap();
    assert!(!recipe.is_favorite);
    assert_eq!(recipe.favorite_count, 0);
    assert!(fixture.fetch_favorites().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_optimistic_toggle_targets_the_filtered_branch_when_active() {
    let (fixture, store, reconciler) = setup(3);
    store.load_first_page().await;
    store
        .apply_filter(RecipeFilter { name: Some("recipe 2".into()), ..Default::default() })
        .await;

    reconciler.toggle_optimistic(2).await.unwrap();
    assert!(store.find_visible(2).unwrap().is_favorite);
    assert_eq!(fixture.call_count("add_favorite"), 1);

    // recipe 1 is not on the filtered branch, so its toggle is ignored
    reconciler.toggle_optimistic(1).await.unwrap();
    assert_eq!(fixture.call_count("add_favorite"), 1);
}

#[tokio::test]
async fn test_strict_toggle_reloads_the_browse_list() {
    let (fixture, store, reconciler) = setup(2);
    store.load_first_page().await;
    assert_eq!(fixture.call_count("fetch_recipes"), 1);

    reconciler.toggle_strict(1).await.unwrap();
    assert_eq!(fixture.call_count("add_favorite"), 1);
    assert_eq!(fixture.call_count("fetch_recipes"), 2);

    // the authoritative state arrived with the reload
    let recipe = store.find_visible(1).unwrap();
    assert!(recipe.is_favorite);
    assert_eq!(recipe.favorite_count, 1);
}

#[tokio::test]
async fn test_strict_toggle_of_invisible_recipe_is_a_noop() {
    let (fixture, store, reconciler) = setup(1);
    store.load_first_page().await;

    reconciler.toggle_strict(42).await.unwrap();
    assert_eq!(fixture.call_count("add_favorite"), 0);
    assert_eq!(fixture.call_count("fetch_recipes"), 1);
}
