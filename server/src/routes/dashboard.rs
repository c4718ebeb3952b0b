//! Dashboard route: `/api/dashboard/`.

use axum::Json;
use axum::extract::State;
use catalog::DashboardData;

use super::auth::AuthUser;
use super::error::ApiError;
use crate::rate_limit::RateClass;
use crate::state::AppState;

/// `GET /api/dashboard/`: catalog totals, low-stock preview and per-category counts.
pub async fn get_dashboard(State(state): State<AppState>, auth: AuthUser) -> Result<Json<DashboardData>, ApiError> {
    auth.admit(&state, RateClass::Read)?;
    Ok(Json(state.store.dashboard().await?))
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
