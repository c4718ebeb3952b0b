//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the catalog store, the bearer-token verifier (with its JWKS
//! cache) and the per-subject rate limiter. Every field is cheap to clone.

use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::services::jwks::TokenVerifier;
use crate::services::store::InventoryStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
    pub verifier: Arc<TokenVerifier>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn InventoryStore>, verifier: TokenVerifier, rate_limiter: RateLimiter) -> Self {
        Self { store, verifier: Arc::new(verifier), rate_limiter }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
