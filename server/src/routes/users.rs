//! User account routes.
//!
//! Creating and deleting users draws on the tighter user-admin budget;
//! renames and (de)activation count as ordinary writes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use catalog::{User, UserInput, UserUpdate};

use super::auth::AuthUser;
use super::categories::PageQuery;
use super::error::{ApiError, parse_id};
use super::extract::{ApiJson, ApiQuery};
use crate::rate_limit::RateClass;
use crate::state::AppState;

fn user_id(raw: &str) -> Result<uuid::Uuid, ApiError> {
    parse_id(raw, |raw| ApiError::user_not_found(raw))
}

/// `GET /api/users/`: list users in creation order.
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    Ok(Json(state.store.list_users(query.page()).await?))
}

/// `POST /api/users/`: create an active user. Emails are unique.
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    auth.admit(&state, RateClass::UserAdmin)?;
    body.validate()?;
    let user = state.store.create_user(body.normalized()).await?;
    tracing::info!(user_id = %user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    let id = user_id(&raw_id)?;
    Ok(Json(state.store.get_user(id).await?))
}

/// `PATCH /api/users/:id`: rename or (de)activate a user.
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
    ApiJson(body): ApiJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    auth.admit(&state, RateClass::Write)?;
    let id = user_id(&raw_id)?;
    body.validate()?;
    Ok(Json(state.store.update_user(id, body.normalized()).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    auth.admit(&state, RateClass::UserAdmin)?;
    let id = user_id(&raw_id)?;
    state.store.delete_user(id).await?;
    tracing::info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
