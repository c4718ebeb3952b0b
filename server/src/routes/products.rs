//! Product routes: `/api/products/`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{Product, ProductInput, ProductLowStock, ProductUpdate, StockUpdate};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::AuthUser;
use super::error::{ApiError, parse_id};
use super::extract::{ApiJson, ApiQuery};
use crate::rate_limit::RateClass;
use crate::services::store::{Page, ProductFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
}

impl ProductQuery {
    pub(crate) fn filter(self) -> ProductFilter {
        ProductFilter {
            page: Page::new(self.skip, self.limit),
            search: self.search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()),
            category_id: self.category_id,
        }
    }
}

fn product_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw, |raw| ApiError::product_not_found(raw))
}

/// `GET /api/products/`: list products, optionally filtered by name and category.
pub async fn list_products(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    Ok(Json(state.store.list_products(&query.filter()).await?))
}

/// `GET /api/products/low-stock`: products at or below the low-stock threshold.
pub async fn list_low_stock(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ProductLowStock>>, ApiError> {
    auth.admit(&state, RateClass::LowStock)?;
    let products = state.store.list_low_stock().await?;
    Ok(Json(products.iter().map(ProductLowStock::from).collect()))
}

/// `POST /api/products/`: create a product.
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    auth.admit(&state, RateClass::Write)?;
    body.validate()?;
    let product = state
        .store
        .create_product(body.normalized())
        .await
        .map_err(ApiError::from_product_store)?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products/:id`: fetch one product.
pub async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    let id = product_id(&raw_id)?;
    Ok(Json(state.store.get_product(id).await?))
}

/// `PATCH /api/products/:id`: partial update; absent fields are untouched.
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    auth.admit(&state, RateClass::Write)?;
    let id = product_id(&raw_id)?;
    body.validate()?;
    let product = state
        .store
        .update_product(id, body.normalized())
        .await
        .map_err(ApiError::from_product_store)?;
    Ok(Json(product))
}

/// `PATCH /api/products/:id/stock`: set the stock level.
pub async fn update_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<StockUpdate>,
) -> Result<Json<Product>, ApiError> {
    auth.admit(&state, RateClass::Write)?;
    let id = product_id(&raw_id)?;
    body.validate()?;
    Ok(Json(state.store.update_stock(id, body.stock).await?))
}

/// `DELETE /api/products/:id`: delete a product.
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth.admit(&state, RateClass::Write)?;
    let id = product_id(&raw_id)?;
    state.store.delete_product(id).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "products_test.rs"]
mod tests;
