//! In-memory `InventoryStore` for local runs without Postgres and for tests.

#[cfg(test)]
#[path = "memory_store_test.rs"]
mod memory_store_test;

use std::collections::HashMap;

use async_trait::async_trait;
use catalog::{
    Category, CategoryInput, CategoryUpdate, DashboardData, Product, ProductInput, ProductUpdate, User, UserInput,
    UserUpdate,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{InventoryStore, Page, ProductFilter, StoreError};

struct UserRecord {
    user: User,
    keycloak_id: Option<String>,
}

#[derive(Default)]
struct Tables {
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
    /// Kept in insertion order.
    users: Vec<UserRecord>,
}

impl Tables {
    fn ensure_category(&self, id: Option<Uuid>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.categories.contains_key(&id) => Err(StoreError::CategoryNotFound(id)),
            _ => Ok(()),
        }
    }

    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.categories.values().any(|c| c.name == name && Some(c.id) != except)
    }

    fn user_mut(&mut self, id: Uuid) -> Result<&mut User, StoreError> {
        self.users
            .iter_mut()
            .map(|record| &mut record.user)
            .find(|user| user.id == id)
            .ok_or(StoreError::UserNotFound(id))
    }

    fn sorted_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        products
    }
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items.into_iter().skip(page.skip as usize).take(page.limit as usize).collect()
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(paginate(categories, page))
    }

    async fn get_category(&self, id: Uuid) -> Result<Category, StoreError> {
        self.tables
            .read()
            .await
            .categories
            .get(&id)
            .cloned()
            .ok_or(StoreError::CategoryNotFound(id))
    }

    async fn create_category(&self, input: CategoryInput) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(&input.name, None) {
            return Err(StoreError::DuplicateCategory(input.name));
        }
        let category = Category { id: Uuid::new_v4(), name: input.name, description: input.description };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(name) = &update.name {
            if tables.name_taken(name, Some(id)) {
                return Err(StoreError::DuplicateCategory(name.clone()));
            }
        }
        let category = tables.categories.get_mut(&id).ok_or(StoreError::CategoryNotFound(id))?;
        update.apply(category);
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(StoreError::CategoryNotFound(id))?;
        for product in tables.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.read().await;
        let matching = tables.sorted_products().into_iter().filter(|p| filter.matches(p)).collect();
        Ok(paginate(matching, filter.page))
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError> {
        let tables = self.tables.read().await;
        let mut low: Vec<Product> = tables
            .sorted_products()
            .into_iter()
            .filter(|p| catalog::is_low_stock(p.stock))
            .collect();
        low.sort_by_key(|p| p.stock);
        Ok(low)
    }

    async fn get_product(&self, id: Uuid) -> Result<Product, StoreError> {
        self.tables
            .read()
            .await
            .products
            .get(&id)
            .cloned()
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn create_product(&self, input: ProductInput) -> Result<Product, StoreError> {
        let mut tables = self.tables.write().await;
        tables.ensure_category(input.category_id)?;
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            category_id: input.category_id,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> Result<Product, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Err(StoreError::ProductNotFound(id));
        }
        if let Some(category_id) = update.category_id {
            tables.ensure_category(category_id)?;
        }
        let product = tables.products.get_mut(&id).ok_or(StoreError::ProductNotFound(id))?;
        update.apply(product);
        Ok(product.clone())
    }

    async fn update_stock(&self, id: Uuid, stock: i32) -> Result<Product, StoreError> {
        let mut tables = self.tables.write().await;
        let product = tables.products.get_mut(&id).ok_or(StoreError::ProductNotFound(id))?;
        product.stock = stock;
        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn dashboard(&self) -> Result<DashboardData, StoreError> {
        let tables = self.tables.read().await;
        let categories: Vec<Category> = tables.categories.values().cloned().collect();
        let products: Vec<Product> = tables.products.values().cloned().collect();
        Ok(DashboardData::summarize(&categories, &products))
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        let users = tables.users.iter().map(|record| record.user.clone()).collect();
        Ok(paginate(users, page))
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.tables
            .read()
            .await
            .users
            .iter()
            .find(|record| record.user.id == id)
            .map(|record| record.user.clone())
            .ok_or(StoreError::UserNotFound(id))
    }

    async fn create_user(&self, input: UserInput) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|record| record.user.email == input.email) {
            return Err(StoreError::DuplicateEmail(input.email));
        }
        if let Some(keycloak_id) = &input.keycloak_id {
            if tables.users.iter().any(|record| record.keycloak_id.as_ref() == Some(keycloak_id)) {
                return Err(StoreError::DuplicateKeycloakId(keycloak_id.clone()));
            }
        }
        let user = User { id: Uuid::new_v4(), email: input.email, full_name: input.full_name, is_active: true };
        tables.users.push(UserRecord { user: user.clone(), keycloak_id: input.keycloak_id });
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables.user_mut(id)?;
        update.apply(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|record| record.user.id != id);
        if tables.users.len() == before {
            return Err(StoreError::UserNotFound(id));
        }
        Ok(())
    }
}
