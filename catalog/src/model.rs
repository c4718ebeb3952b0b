//! Category and product DTOs.
//!
//! DESIGN
//! ======
//! Update bodies are partial: an absent field is left untouched. For nullable
//! columns (`description`, `category_id`) an explicit `null` clears the value,
//! so those fields are `Option<Option<T>>` with a custom deserializer that
//! tells "missing" from "null".

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A product category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /categories/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PATCH /categories/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl CategoryUpdate {
    /// Apply the present fields to `category`.
    pub fn apply(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            category.description.clone_from(description);
        }
    }
}

/// A stocked product. `price` is in BRL with at most two decimal places.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// Body of `POST /products/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    pub stock: i32,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// Body of `PATCH /products/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_optional_price", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<Uuid>>,
}

impl ProductUpdate {
    /// Full replacement update, as sent by the edit form.
    #[must_use]
    pub fn replace_with(input: ProductInput) -> Self {
        Self {
            name: Some(input.name),
            description: Some(input.description),
            price: Some(input.price),
            stock: Some(input.stock),
            category_id: Some(input.category_id),
        }
    }

    /// Apply the present fields to `product`.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            product.description.clone_from(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
    }
}

/// Body of `PATCH /products/{id}/stock`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub stock: i32,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Prices may arrive as JSON numbers or as decimal strings (`"10.50"`).
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    price_from_value(&value).map_err(D::Error::custom)
}

fn deserialize_optional_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    price_from_value(&value).map(Some).map_err(D::Error::custom)
}

fn price_from_value(value: &serde_json::Value) -> Result<f64, String> {
    let price = match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    price
        .filter(|p| p.is_finite())
        .ok_or_else(|| format!("invalid price: {value}"))
}
