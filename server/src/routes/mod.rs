//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the catalog REST API under `/api` and stitches it with
//! Leptos SSR rendering under a single Axum router. The static silent-SSO
//! landing page and the compiled client bundle (`/pkg`) are served from the
//! Leptos site root.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod error;
pub mod extract;
pub mod products;
pub mod users;

use std::path::PathBuf;

use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::routing::{get, patch};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const SILENT_CHECK_PAGE: &str = "silent-check-sso.html";

/// CORS policy: any origin when the list is empty, otherwise exactly the list.
pub(crate) fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };
    CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any)
}

/// Catalog and user REST routes, mounted under `/api`.
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list_categories).post(categories::create_category))
        .route("/categories/", get(categories::list_categories).post(categories::create_category))
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/products", get(products::list_products).post(products::create_product))
        .route("/products/", get(products::list_products).post(products::create_product))
        .route("/products/low-stock", get(products::list_low_stock))
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/{id}/stock", patch(products::update_stock))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/dashboard/", get(dashboard::get_dashboard))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).patch(users::update_user).delete(users::delete_user))
}

/// API routes plus the health probe, with CORS and request tracing.
pub fn api_routes(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .nest("/api", catalog_routes())
        .route("/healthz", get(healthz))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Location of the silent-SSO landing page: the built site root when present,
/// otherwise the client's public assets.
fn silent_check_page(site_root: &str) -> PathBuf {
    let built = PathBuf::from(site_root).join(SILENT_CHECK_PAGE);
    if built.exists() {
        built
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../client/public").join(SILENT_CHECK_PAGE)
    }
}

/// Full application: API routes + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[[workspace.metadata.leptos]]` section).
pub fn app(state: AppState, cors_origins: &[String]) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root = leptos_options.site_root.to_string();
    let site_root_path = PathBuf::from(&site_root);

    Ok(api_routes(state, cors_origins)
        .route_service(&format!("/{SILENT_CHECK_PAGE}"), ServeFile::new(silent_check_page(&site_root)))
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .merge(leptos_router)
        .layer(CompressionLayer::new()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
