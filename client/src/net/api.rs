//! REST API helpers for the catalog backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, each carrying the
//! session's bearer token when one exists.
//! Server-side (SSR): stubs returning an error since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<T, String>`. Non-2xx responses become the
//! backend's `detail` message when present so views can show or log it.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use catalog::{Category, CategoryInput, DashboardData, Product, ProductInput, ProductLowStock, ProductUpdate, StockUpdate};
use uuid::Uuid;

#[cfg(not(feature = "hydrate"))]
const SERVER_STUB: &str = "not available on server";

/// Filters for the product listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Encoded query string including the leading `?`, or empty.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(skip) = self.skip {
            params.push(format!("skip={skip}"));
        }
        if let Some(limit) = self.limit {
            params.push(format!("limit={limit}"));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(format!("search={}", urlencoding::encode(search)));
        }
        if let Some(category_id) = self.category_id {
            params.push(format!("category_id={category_id}"));
        }
        if params.is_empty() { String::new() } else { format!("?{}", params.join("&")) }
    }
}

/// Base URL of the REST API, overridable at build time.
#[must_use]
pub fn api_base() -> &'static str {
    option_env!("INVENTORY_API_URL").unwrap_or("/api")
}

#[cfg(any(test, feature = "hydrate"))]
fn join(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

#[cfg(any(test, feature = "hydrate"))]
fn categories_endpoint(base: &str) -> String {
    join(base, "/categories/")
}

#[cfg(any(test, feature = "hydrate"))]
fn category_endpoint(base: &str, id: Uuid) -> String {
    join(base, &format!("/categories/{id}"))
}

#[cfg(any(test, feature = "hydrate"))]
fn products_endpoint(base: &str, query: &ProductQuery) -> String {
    join(base, &format!("/products/{}", query.query_string()))
}

#[cfg(any(test, feature = "hydrate"))]
fn low_stock_endpoint(base: &str) -> String {
    join(base, "/products/low-stock")
}

#[cfg(any(test, feature = "hydrate"))]
fn product_endpoint(base: &str, id: Uuid) -> String {
    join(base, &format!("/products/{id}"))
}

#[cfg(any(test, feature = "hydrate"))]
fn product_stock_endpoint(base: &str, id: Uuid) -> String {
    join(base, &format!("/products/{id}/stock"))
}

#[cfg(any(test, feature = "hydrate"))]
fn dashboard_endpoint(base: &str) -> String {
    join(base, "/dashboard/")
}

#[cfg(any(test, feature = "hydrate"))]
fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Human-readable failure for a non-2xx response.
#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
        .unwrap_or_else(|| format!("request failed: {status}"))
}

#[cfg(feature = "hydrate")]
mod http {
    use gloo_net::http::{RequestBuilder, Response};
    use serde::Serialize;
    use serde::de::DeserializeOwned;

    use super::{bearer, request_failed_message};

    pub(super) fn authorized(builder: RequestBuilder) -> RequestBuilder {
        match crate::app::session_manager().access_token() {
            Some(token) => builder.header("Authorization", &bearer(&token)),
            None => builder,
        }
    }

    async fn ensure_ok(resp: Response) -> Result<Response, String> {
        if resp.ok() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(request_failed_message(status, &body))
    }

    pub(super) async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
        let resp = authorized(gloo_net::http::Request::get(url))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        ensure_ok(resp).await?.json::<T>().await.map_err(|e| e.to_string())
    }

    pub(super) async fn send_json<B: Serialize, T: DeserializeOwned>(
        builder: RequestBuilder,
        body: &B,
    ) -> Result<T, String> {
        let resp = authorized(builder)
            .json(body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        ensure_ok(resp).await?.json::<T>().await.map_err(|e| e.to_string())
    }

    pub(super) async fn delete(url: &str) -> Result<(), String> {
        let resp = authorized(gloo_net::http::Request::delete(url))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        ensure_ok(resp).await.map(|_| ())
    }
}

// =============================================================================
// Categories
// =============================================================================

/// List categories via `GET /categories/`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn fetch_categories() -> Result<Vec<Category>, String> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&categories_endpoint(api_base())).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(SERVER_STUB.to_owned())
    }
}

/// Create a category via `POST /categories/`.
///
/// # Errors
///
/// Returns the server's `detail` (e.g. duplicate name) or a transport error.
pub async fn create_category(input: &CategoryInput) -> Result<Category, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = categories_endpoint(api_base());
        http::send_json(gloo_net::http::Request::post(&url), input).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = input;
        Err(SERVER_STUB.to_owned())
    }
}

/// Delete a category via `DELETE /categories/{id}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn delete_category(id: Uuid) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        http::delete(&category_endpoint(api_base(), id)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
        Err(SERVER_STUB.to_owned())
    }
}

// =============================================================================
// Products
// =============================================================================

/// List products via `GET /products/` with optional filters.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn fetch_products(query: &ProductQuery) -> Result<Vec<Product>, String> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&products_endpoint(api_base(), query)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = query;
        Err(SERVER_STUB.to_owned())
    }
}

/// List low-stock products via `GET /products/low-stock`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn fetch_low_stock() -> Result<Vec<ProductLowStock>, String> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&low_stock_endpoint(api_base())).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(SERVER_STUB.to_owned())
    }
}

/// Fetch one product via `GET /products/{id}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the product is missing.
pub async fn fetch_product(id: Uuid) -> Result<Product, String> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&product_endpoint(api_base(), id)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
        Err(SERVER_STUB.to_owned())
    }
}

/// Create a product via `POST /products/`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn create_product(input: &ProductInput) -> Result<Product, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = products_endpoint(api_base(), &ProductQuery::default());
        http::send_json(gloo_net::http::Request::post(&url), input).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = input;
        Err(SERVER_STUB.to_owned())
    }
}

/// Partially update a product via `PATCH /products/{id}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn update_product(id: Uuid, update: &ProductUpdate) -> Result<Product, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = product_endpoint(api_base(), id);
        http::send_json(gloo_net::http::Request::patch(&url), update).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (id, update);
        Err(SERVER_STUB.to_owned())
    }
}

/// Set a product's stock via `PATCH /products/{id}/stock`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn update_product_stock(id: Uuid, stock: i32) -> Result<Product, String> {
    #[cfg(feature = "hydrate")]
    {
        let url = product_stock_endpoint(api_base(), id);
        http::send_json(gloo_net::http::Request::patch(&url), &StockUpdate { stock }).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (id, StockUpdate { stock });
        Err(SERVER_STUB.to_owned())
    }
}

/// Delete a product via `DELETE /products/{id}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn delete_product(id: Uuid) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        http::delete(&product_endpoint(api_base(), id)).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
        Err(SERVER_STUB.to_owned())
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Fetch the aggregate dashboard via `GET /dashboard/`.
///
/// # Errors
///
/// Returns an error string if the request fails or the server rejects it.
pub async fn fetch_dashboard() -> Result<DashboardData, String> {
    #[cfg(feature = "hydrate")]
    {
        http::get_json(&dashboard_endpoint(api_base())).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(SERVER_STUB.to_owned())
    }
}
