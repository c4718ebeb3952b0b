//! Dashboard aggregate: totals, low-stock list, products per category.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Category, Product};
use crate::stock::is_low_stock;

/// Label of the per-category row that counts products without a category.
pub const UNCATEGORIZED_LABEL: &str = "Sem categoria";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_id: Option<Uuid>,
    pub category_name: String,
    pub product_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLowStock {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
    pub category_id: Option<Uuid>,
}

impl From<&Product> for ProductLowStock {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            stock: product.stock,
            category_id: product.category_id,
        }
    }
}

/// Body of `GET /dashboard/`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub total_products: i64,
    pub total_categories: i64,
    /// Sum of `price * stock` over every product.
    pub total_stock_value: f64,
    pub low_stock_count: i64,
    pub low_stock_products: Vec<ProductLowStock>,
    pub products_by_category: Vec<CategorySummary>,
}

impl DashboardData {
    /// Aggregate an in-memory catalog.
    ///
    /// Low-stock products are ordered by stock then name. Category rows are
    /// ordered by name with the uncategorised row last; categories without
    /// products are omitted.
    #[must_use]
    pub fn summarize(categories: &[Category], products: &[Product]) -> Self {
        let mut low_stock_products: Vec<ProductLowStock> = products
            .iter()
            .filter(|p| is_low_stock(p.stock))
            .map(ProductLowStock::from)
            .collect();
        low_stock_products.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));

        let mut counts: HashMap<Option<Uuid>, i64> = HashMap::new();
        for product in products {
            *counts.entry(product.category_id).or_default() += 1;
        }
        let names: HashMap<Uuid, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
        let mut products_by_category: Vec<CategorySummary> = counts
            .into_iter()
            .map(|(category_id, product_count)| CategorySummary {
                category_id,
                category_name: category_id
                    .and_then(|id| names.get(&id).copied())
                    .unwrap_or(UNCATEGORIZED_LABEL)
                    .to_owned(),
                product_count,
            })
            .collect();
        products_by_category.sort_by(|a, b| {
            a.category_id
                .is_none()
                .cmp(&b.category_id.is_none())
                .then_with(|| a.category_name.cmp(&b.category_name))
        });

        Self {
            total_products: to_i64(products.len()),
            total_categories: to_i64(categories.len()),
            total_stock_value: products.iter().map(|p| p.price * f64::from(p.stock)).sum(),
            low_stock_count: to_i64(low_stock_products.len()),
            low_stock_products,
            products_by_category,
        }
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
