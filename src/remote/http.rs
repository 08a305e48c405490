// ABOUTME: HTTP implementation of the RemoteCatalog trait using reqwest
// ABOUTME: Handles bearer authentication, JSON decoding, and DTO-to-model conversion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::core::RemoteCatalog;
use crate::config::ClientConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    IngredientRequirement, InventoryItem, RecipeDetail, RecipeDraft, RecipeFilter, RecipeQuantity,
    RecipeSummary, Unit,
};
use crate::pagination::{Page, PageRequest};

/// Catalog service response for a paginated listing
#[derive(Debug, Deserialize)]
struct PageResponse<T> {
    items: Vec<T>,
    page: u32,
    total_pages: u32,
    total_items: u64,
}

/// Catalog service response for a recipe summary
#[derive(Debug, Deserialize)]
struct RecipeSummaryResponse {
    id: i64,
    name: String,
    description: String,
    prep_time_minutes: u32,
    #[serde(default)]
    allergens: Vec<String>,
    owner_id: i64,
    is_favorite: bool,
    favorite_count: u32,
}

impl From<RecipeSummaryResponse> for RecipeSummary {
    fn from(r: RecipeSummaryResponse) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            prep_time_minutes: r.prep_time_minutes,
            allergens: r.allergens.into_iter().collect::<BTreeSet<_>>(),
            owner_id: r.owner_id,
            is_favorite: r.is_favorite,
            favorite_count: r.favorite_count,
        }
    }
}

/// Catalog service response for a recipe detail
#[derive(Debug, Deserialize)]
struct RecipeDetailResponse {
    #[serde(flatten)]
    summary: RecipeSummaryResponse,
    guide_steps: Vec<String>,
    ingredients: Vec<IngredientLineResponse>,
}

/// Catalog service response for one ingredient line
#[derive(Debug, Deserialize)]
struct IngredientLineResponse {
    ingredient_id: i64,
    name: String,
    quantity: f64,
    unit: Unit,
}

impl From<IngredientLineResponse> for IngredientRequirement {
    fn from(r: IngredientLineResponse) -> Self {
        Self {
            ingredient_id: r.ingredient_id,
            name: r.name,
            quantity: r.quantity,
            unit: r.unit,
        }
    }
}

impl From<RecipeDetailResponse> for RecipeDetail {
    fn from(r: RecipeDetailResponse) -> Self {
        Self {
            summary: r.summary.into(),
            guide_steps: r.guide_steps,
            ingredients: r.ingredients.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request body for the shopping-list resolution endpoints
#[derive(Debug, Serialize)]
struct TotalsRequest<'a> {
    totals: &'a [IngredientRequirement],
}

#[derive(Debug, Serialize)]
struct QuantitiesRequest<'a> {
    quantities: &'a [RecipeQuantity],
}

#[derive(Debug, Serialize)]
struct DeltaRequest<'a> {
    items: &'a [IngredientRequirement],
}

/// HTTP client for the remote catalog service
pub struct HttpCatalog {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCatalog {
    /// Build a client from the environment configuration
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            token: config.api_token.clone(),
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and decode the JSON body, mapping HTTP-level failures
    /// to transport errors
    async fn send_json<T>(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await.map_err(|e| {
            AppError::remote_service(format!("request to {endpoint} failed: {e}")).with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::remote_service(format!(
                "{endpoint} returned {status}: {body}"
            )));
        }

        debug!(endpoint, %status, "catalog request succeeded");
        response.json().await.map_err(|e| {
            AppError::remote_decode(format!("invalid response from {endpoint}: {e}")).with_source(e)
        })
    }

    /// Send a request where only the status matters
    async fn send_unit(&self, builder: RequestBuilder, endpoint: &str) -> AppResult<()> {
        let response = builder.send().await.map_err(|e| {
            AppError::remote_service(format!("request to {endpoint} failed: {e}")).with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::remote_service(format!(
                "{endpoint} returned {status}: {body}"
            )));
        }
        debug!(endpoint, %status, "catalog request succeeded");
        Ok(())
    }

    fn page_query(builder: RequestBuilder, request: PageRequest) -> RequestBuilder {
        builder.query(&[("page", request.page), ("per_page", request.per_page)])
    }

    fn into_page(response: PageResponse<RecipeSummaryResponse>) -> Page<RecipeSummary> {
        Page::new(
            response.items.into_iter().map(Into::into).collect(),
            response.page,
            response.total_pages,
            response.total_items,
        )
    }
}

#[async_trait]
impl RemoteCatalog for HttpCatalog {
    async fn fetch_recipes(&self, request: PageRequest) -> AppResult<Page<RecipeSummary>> {
        let builder = Self::page_query(self.request(Method::GET, "recipes"), request);
        let response: PageResponse<RecipeSummaryResponse> =
            self.send_json(builder, "recipes").await?;
        Ok(Self::into_page(response))
    }

    async fn filter_recipes(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> AppResult<Page<RecipeSummary>> {
        let mut builder = Self::page_query(self.request(Method::GET, "recipes/filter"), request);
        if let Some(name) = &filter.name {
            builder = builder.query(&[("name", name)]);
        }
        if let Some(min) = filter.min_time {
            builder = builder.query(&[("min_time", min)]);
        }
        if let Some(max) = filter.max_time {
            builder = builder.query(&[("max_time", max)]);
        }
        if !filter.exclude_allergens.is_empty() {
            let allergens = filter
                .exclude_allergens
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(",");
            builder = builder.query(&[("exclude_allergens", allergens)]);
        }
        let response: PageResponse<RecipeSummaryResponse> =
            self.send_json(builder, "recipes/filter").await?;
        Ok(Self::into_page(response))
    }

    async fn fetch_favorites(&self) -> AppResult<Vec<RecipeSummary>> {
        let builder = self.request(Method::GET, "favorites");
        let response: Vec<RecipeSummaryResponse> = self.send_json(builder, "favorites").await?;
        Ok(response.into_iter().map(Into::into).collect())
    }

    async fn add_favorite(&self, recipe_id: i64) -> AppResult<()> {
        let endpoint = format!("favorites/{recipe_id}");
        self.send_unit(self.request(Method::POST, &endpoint), &endpoint).await
    }

    async fn remove_favorite(&self, recipe_id: i64) -> AppResult<()> {
        let endpoint = format!("favorites/{recipe_id}");
        self.send_unit(self.request(Method::DELETE, &endpoint), &endpoint).await
    }

    async fn fetch_suggestions(&self) -> AppResult<Vec<RecipeSummary>> {
        let builder = self.request(Method::GET, "suggestions");
        let response: Vec<RecipeSummaryResponse> = self.send_json(builder, "suggestions").await?;
        Ok(response.into_iter().map(Into::into).collect())
    }

    async fn fetch_user_recipes(&self) -> AppResult<Vec<RecipeSummary>> {
        let builder = self.request(Method::GET, "users/me/recipes");
        let response: Vec<RecipeSummaryResponse> =
            self.send_json(builder, "users/me/recipes").await?;
        Ok(response.into_iter().map(Into::into).collect())
    }

    async fn fetch_recipe_detail(&self, recipe_id: i64) -> AppResult<RecipeDetail> {
        let endpoint = format!("recipes/{recipe_id}");
        let response: RecipeDetailResponse =
            self.send_json(self.request(Method::GET, &endpoint), &endpoint).await?;
        Ok(response.into())
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> AppResult<RecipeSummary> {
        draft.validate()?;
        let builder = self.request(Method::POST, "recipes").json(draft);
        let response: RecipeSummaryResponse = self.send_json(builder, "recipes").await?;
        Ok(response.into())
    }

    async fn update_recipe(
        &self,
        recipe_id: i64,
        draft: &RecipeDraft,
    ) -> AppResult<RecipeSummary> {
        draft.validate()?;
        let endpoint = format!("recipes/{recipe_id}");
        let builder = self.request(Method::PUT, &endpoint).json(draft);
        let response: RecipeSummaryResponse = self.send_json(builder, &endpoint).await?;
        Ok(response.into())
    }

    async fn delete_recipe(&self, recipe_id: i64) -> AppResult<()> {
        let endpoint = format!("recipes/{recipe_id}");
        self.send_unit(self.request(Method::DELETE, &endpoint), &endpoint).await
    }

    async fn fetch_inventory(&self) -> AppResult<Vec<InventoryItem>> {
        let builder = self.request(Method::GET, "inventory");
        self.send_json(builder, "inventory").await
    }

    async fn apply_inventory_delta(&self, items: &[IngredientRequirement]) -> AppResult<()> {
        let builder = self
            .request(Method::POST, "inventory/delta")
            .json(&DeltaRequest { items });
        self.send_unit(builder, "inventory/delta").await
    }

    async fn compute_ingredient_totals(
        &self,
        quantities: &[RecipeQuantity],
    ) -> AppResult<Vec<IngredientRequirement>> {
        let builder = self
            .request(Method::POST, "ingredients/totals")
            .json(&QuantitiesRequest { quantities });
        self.send_json(builder, "ingredients/totals").await
    }

    async fn resolve_shopping_list(
        &self,
        totals: &[IngredientRequirement],
    ) -> AppResult<Vec<IngredientRequirement>> {
        let builder = self
            .request(Method::POST, "shopping/resolve")
            .json(&TotalsRequest { totals });
        self.send_json(builder, "shopping/resolve").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let config = ClientConfig {
            api_base_url: "http://localhost:8080/api/".into(),
            ..Default::default()
        };
        let catalog = HttpCatalog::new(&config).unwrap();
        assert_eq!(catalog.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_summary_dto_conversion() {
        let dto = RecipeSummaryResponse {
            id: 3,
            name: "Chili".into(),
            description: "Slow-cooked".into(),
            prep_time_minutes: 45,
            allergens: vec!["soy".into(), "soy".into()],
            owner_id: 9,
            is_favorite: true,
            favorite_count: 12,
        };
        let summary: RecipeSummary = dto.into();
        // duplicate allergens collapse into the set
        assert_eq!(summary.allergens.len(), 1);
        assert!(summary.is_favorite);
    }
}
