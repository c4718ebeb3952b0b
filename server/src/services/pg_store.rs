//! Postgres-backed `InventoryStore`.
//!
//! DESIGN
//! ======
//! Prices live in `NUMERIC(10,2)` and cross the wire as `float8`; the casts
//! sit in the SQL so the Rust side stays on `f64`. Unique and foreign-key
//! violations are mapped to domain errors instead of surfacing as 500s.

#[cfg(test)]
#[path = "pg_store_test.rs"]
mod pg_store_test;

use async_trait::async_trait;
use catalog::{
    Category, CategoryInput, CategorySummary, CategoryUpdate, DashboardData, LOW_STOCK_THRESHOLD, Product,
    ProductInput, ProductLowStock, ProductUpdate, UNCATEGORIZED_LABEL, User, UserInput, UserUpdate,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::store::{InventoryStore, Page, ProductFilter, StoreError};

type CategoryRow = (Uuid, String, Option<String>);
type ProductRow = (Uuid, String, Option<String>, f64, i32, Option<Uuid>);
type UserRow = (Uuid, String, String, bool);

const PRODUCT_COLUMNS: &str = "id, name, description, price::float8, stock, category_id";
const USER_COLUMNS: &str = "id, email, full_name, is_active";
const USER_EMAIL_CONSTRAINT: &str = "users_email_key";

fn to_category((id, name, description): CategoryRow) -> Category {
    Category { id, name, description }
}

fn to_product((id, name, description, price, stock, category_id): ProductRow) -> Product {
    Product { id, name, description, price, stock, category_id }
}

fn to_user((id, email, full_name, is_active): UserRow) -> User {
    User { id, email, full_name, is_active }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Name of the unique constraint `err` violated, if it is one.
fn violated_unique_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(db.constraint().unwrap_or_default()),
        _ => None,
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_product<'e, E>(executor: E, id: Uuid) -> Result<Product, StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"))
            .bind(id)
            .fetch_optional(executor)
            .await?
            .map(to_product)
            .ok_or(StoreError::ProductNotFound(id))
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn list_categories(&self, page: Page) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description FROM categories ORDER BY name, id OFFSET $1 LIMIT $2",
        )
        .bind(i64::from(page.skip))
        .bind(i64::from(page.limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(to_category).collect())
    }

    async fn get_category(&self, id: Uuid) -> Result<Category, StoreError> {
        sqlx::query_as::<_, CategoryRow>("SELECT id, name, description FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(to_category)
            .ok_or(StoreError::CategoryNotFound(id))
    }

    async fn create_category(&self, input: CategoryInput) -> Result<Category, StoreError> {
        let id = Uuid::new_v4();
        let result = sqlx::query("INSERT INTO categories (id, name, description) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .execute(&self.pool)
            .await;
        match result {
            Ok(_) => Ok(Category { id, name: input.name, description: input.description }),
            Err(e) if is_unique_violation(&e) => Err(StoreError::DuplicateCategory(input.name)),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<Category, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut category = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description FROM categories WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .map(to_category)
        .ok_or(StoreError::CategoryNotFound(id))?;
        update.apply(&mut category);

        let result = sqlx::query("UPDATE categories SET name = $2, description = $3 WHERE id = $1")
            .bind(id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(StoreError::DuplicateCategory(category.name)),
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;
        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), StoreError> {
        // products.category_id is ON DELETE SET NULL.
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::CategoryNotFound(id));
        }
        Ok(())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
               AND ($2::uuid IS NULL OR category_id = $2)
             ORDER BY name, id
             OFFSET $3 LIMIT $4"
        ))
        .bind(filter.search.as_deref())
        .bind(filter.category_id)
        .bind(i64::from(filter.page.skip))
        .bind(i64::from(filter.page.limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(to_product).collect())
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= $1 ORDER BY stock, name, id"
        ))
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(to_product).collect())
    }

    async fn get_product(&self, id: Uuid) -> Result<Product, StoreError> {
        sqlx::query_as::<_, ProductRow>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(to_product)
            .ok_or(StoreError::ProductNotFound(id))
    }

    async fn create_product(&self, input: ProductInput) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (id, name, description, price, stock, category_id)
             VALUES ($1, $2, $3, $4::numeric, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await;
        match row {
            Ok(row) => Ok(to_product(row)),
            Err(e) if is_foreign_key_violation(&e) => {
                Err(StoreError::CategoryNotFound(input.category_id.unwrap_or_default()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_product(&self, id: Uuid, update: ProductUpdate) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut product = Self::fetch_product(&mut *tx, id).await?;
        update.apply(&mut product);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET name = $2, description = $3, price = $4::numeric, stock = $5, category_id = $6
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category_id)
        .fetch_one(&mut *tx)
        .await;
        let updated = match row {
            Ok(row) => to_product(row),
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(StoreError::CategoryNotFound(product.category_id.unwrap_or_default()));
            }
            Err(e) => return Err(e.into()),
        };
        tx.commit().await?;
        Ok(updated)
    }

    async fn update_stock(&self, id: Uuid, stock: i32) -> Result<Product, StoreError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET stock = $2 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?
        .map(to_product)
        .ok_or(StoreError::ProductNotFound(id))
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::ProductNotFound(id));
        }
        Ok(())
    }

    async fn dashboard(&self) -> Result<DashboardData, StoreError> {
        let (total_products, total_categories, total_stock_value, low_stock_count) =
            sqlx::query_as::<_, (i64, i64, f64, i64)>(
                "SELECT
                    (SELECT count(*) FROM products),
                    (SELECT count(*) FROM categories),
                    (SELECT COALESCE(sum(price * stock), 0)::float8 FROM products),
                    (SELECT count(*) FROM products WHERE stock <= $1)",
            )
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&self.pool)
            .await?;

        let by_category = sqlx::query_as::<_, (Option<Uuid>, String, i64)>(
            "SELECT c.id, COALESCE(c.name, $1), count(p.id)
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             GROUP BY c.id, c.name
             ORDER BY (c.id IS NULL), c.name",
        )
        .bind(UNCATEGORIZED_LABEL)
        .fetch_all(&self.pool)
        .await?;

        let low_stock_products = self.list_low_stock().await?.iter().map(ProductLowStock::from).collect();

        Ok(DashboardData {
            total_products,
            total_categories,
            total_stock_value,
            low_stock_count,
            low_stock_products,
            products_by_category: by_category
                .into_iter()
                .map(|(category_id, category_name, product_count)| CategorySummary {
                    category_id,
                    category_name,
                    product_count,
                })
                .collect(),
        })
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id OFFSET $1 LIMIT $2"
        ))
        .bind(i64::from(page.skip))
        .bind(i64::from(page.limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(to_user).collect())
    }

    async fn get_user(&self, id: Uuid) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(to_user)
            .ok_or(StoreError::UserNotFound(id))
    }

    async fn create_user(&self, input: UserInput) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (id, email, full_name, keycloak_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&input.email)
        .bind(&input.full_name)
        .bind(&input.keycloak_id)
        .fetch_one(&self.pool)
        .await;
        match row {
            Ok(row) => Ok(to_user(row)),
            Err(e) => match violated_unique_constraint(&e) {
                Some(USER_EMAIL_CONSTRAINT) => Err(StoreError::DuplicateEmail(input.email)),
                Some(_) => Err(StoreError::DuplicateKeycloakId(input.keycloak_id.unwrap_or_default())),
                None => Err(e.into()),
            },
        }
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users
             SET full_name = COALESCE($2, full_name), is_active = COALESCE($3, is_active)
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.full_name)
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await?
        .map(to_user)
        .ok_or(StoreError::UserNotFound(id))
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::UserNotFound(id));
        }
        Ok(())
    }
}
