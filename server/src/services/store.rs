//! Catalog and user persistence seam.
//!
//! DESIGN
//! ======
//! Handlers talk to `Arc<dyn InventoryStore>` so the same routes run against
//! Postgres in production and an in-memory map for local use and tests.
//! Inputs arrive already validated and normalized by the route layer.

use async_trait::async_trait;
use catalog::{
    Category, CategoryInput, CategoryUpdate, DashboardData, Product, ProductInput, ProductUpdate, User, UserInput,
    UserUpdate,
};
use uuid::Uuid;

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("category not found: {0}")]
    CategoryNotFound(Uuid),
    #[error("product not found: {0}")]
    ProductNotFound(Uuid),
    #[error("category name already exists: {0}")]
    DuplicateCategory(String),
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("user email already exists: {0}")]
    DuplicateEmail(String),
    #[error("identity already linked to another user: {0}")]
    DuplicateKeycloakId(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// `skip`/`limit` window over a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    /// Apply defaults and cap `limit`.
    #[must_use]
    pub fn new(skip: Option<u32>, limit: Option<u32>) -> Self {
        Self { skip: skip.unwrap_or(0), limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Product listing filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub page: Page,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
}

impl ProductFilter {
    /// Whether `product` passes the search and category filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map_or(true, |needle| product.name.to_lowercase().contains(&needle.to_lowercase()));
        let category_ok = self.category_id.map_or(true, |id| product.category_id == Some(id));
        search_ok && category_ok
    }
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Categories ordered by name.
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>, StoreError>;
    async fn get_category(&self, id: Uuid) -> Result<Category, StoreError>;
    async fn create_category(&self, input: CategoryInput) -> Result<Category, StoreError>;
    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<Category, StoreError>;
    /// Delete a category; its products stay, without a category.
    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError>;

    /// Products ordered by name.
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError>;
    /// Products at or below the low-stock threshold, lowest stock first.
    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError>;
    async fn get_product(&self, id: Uuid) -> Result<Product, StoreError>;
    async fn create_product(&self, input: ProductInput) -> Result<Product, StoreError>;
    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> Result<Product, StoreError>;
    async fn update_stock(&self, id: Uuid, stock: i32) -> Result<Product, StoreError>;
    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError>;

    async fn dashboard(&self) -> Result<DashboardData, StoreError>;

    /// Users in insertion order.
    async fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError>;
    async fn get_user(&self, id: Uuid) -> Result<User, StoreError>;
    /// Create an active user; email and `keycloak_id` are unique.
    async fn create_user(&self, input: UserInput) -> Result<User, StoreError>;
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError>;
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;
}
