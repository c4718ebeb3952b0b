//! Category routes: `/api/categories/`.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{Category, CategoryInput, CategoryUpdate};
use serde::Deserialize;

use super::auth::AuthUser;
use super::error::{ApiError, parse_id};
use super::extract::{ApiJson, ApiQuery};
use crate::rate_limit::RateClass;
use crate::services::store::Page;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub(crate) fn page(&self) -> Page {
        Page::new(self.skip, self.limit)
    }
}

fn category_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
    parse_id(raw, |raw| ApiError::category_not_found(raw))
}

/// `GET /api/categories/`: list categories by name.
pub async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<Category>>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    Ok(Json(state.store.list_categories(query.page()).await?))
}

/// `POST /api/categories/`: create a category.
pub async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    auth.admit(&state, RateClass::Write)?;
    body.validate()?;
    let category = state.store.create_category(body.normalized()).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /api/categories/:id`: fetch one category.
pub async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    let id = category_id(&raw_id)?;
    Ok(Json(state.store.get_category(id).await?))
}

/// `PATCH /api/categories/:id`: rename or re-describe a category.
pub async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<CategoryUpdate>,
) -> Result<Json<Category>, ApiError> {
    auth.admit(&state, RateClass::Write)?;
    let id = category_id(&raw_id)?;
    body.validate()?;
    Ok(Json(state.store.update_category(id, body.normalized()).await?))
}

/// `DELETE /api/categories/:id`: delete a category; its products become uncategorised.
pub async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth.admit(&state, RateClass::Write)?;
    let id = category_id(&raw_id)?;
    state.store.delete_category(id).await?;
    tracing::info!(category_id = %id, "category deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;
