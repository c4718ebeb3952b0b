//! Field rules for categories and products.
//!
//! DESIGN
//! ======
//! Every rule produces a user-facing pt-BR message tied to a [`Field`], so the
//! console can place it under the offending input and the server can return it
//! verbatim in a 422 body. All failing fields are reported, not just the first.
//!
//! [`ProductForm`] is the raw text of the product form. Parsing it is the only
//! path from user input to a [`ProductInput`], which keeps "no network call
//! with an invalid body" a property of the types.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use serde::Serialize;
use uuid::Uuid;

use crate::model::{CategoryInput, CategoryUpdate, Product, ProductInput, ProductUpdate, StockUpdate};

pub const NAME_MIN_CHARS: usize = 2;
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;
pub const CATEGORY_DESCRIPTION_MAX_CHARS: usize = 500;
pub const PRODUCT_NAME_MAX_CHARS: usize = 255;
pub const PRODUCT_DESCRIPTION_MAX_CHARS: usize = 1000;
/// Largest value a NUMERIC(10,2) column holds.
pub const PRICE_MAX: f64 = 99_999_999.99;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Description,
    Price,
    Stock,
    CategoryId,
    Email,
    FullName,
    KeycloakId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{}", join_messages(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>().join("; ")
}

impl ValidationError {
    /// First message reported for `field`.
    #[must_use]
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    pub(crate) fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError { field, message: message.into() });
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

// =============================================================
// Rules
// =============================================================

fn check_name(errors: &mut ValidationError, name: &str, max: usize) {
    let len = name.trim().chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(Field::Name, format!("Nome deve ter pelo menos {NAME_MIN_CHARS} caracteres"));
    } else if len > max {
        errors.push(Field::Name, format!("Nome deve ter no máximo {max} caracteres"));
    }
}

fn check_description(errors: &mut ValidationError, description: Option<&str>, max: usize) {
    if description.is_some_and(|d| d.chars().count() > max) {
        errors.push(Field::Description, format!("Descrição deve ter no máximo {max} caracteres"));
    }
}

fn check_price(errors: &mut ValidationError, price: f64) {
    if !price.is_finite() {
        errors.push(Field::Price, "Preço inválido");
    } else if price <= 0.0 {
        errors.push(Field::Price, "Preço deve ser maior que 0");
    } else if price > PRICE_MAX {
        errors.push(Field::Price, "Preço excede o valor máximo permitido");
    } else if !has_at_most_two_decimals(price) {
        errors.push(Field::Price, "Preço deve ter no máximo 2 casas decimais");
    }
}

fn has_at_most_two_decimals(price: f64) -> bool {
    let cents = price * 100.0;
    (cents - cents.round()).abs() < 1e-6
}

fn check_stock(errors: &mut ValidationError, stock: i32) {
    if stock < 0 {
        errors.push(Field::Stock, "Estoque não pode ser negativo");
    }
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned)
}

// =============================================================
// Categories
// =============================================================

impl CategoryInput {
    /// Build a category body from form text. A blank description is omitted.
    ///
    /// # Errors
    ///
    /// Returns every rule the values break.
    pub fn from_form(name: &str, description: &str) -> Result<Self, ValidationError> {
        let input = Self { name: name.to_owned(), description: Some(description.to_owned()) }.normalized();
        input.validate()?;
        Ok(input)
    }

    /// # Errors
    ///
    /// Returns every rule the body breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_name(&mut errors, &self.name, CATEGORY_NAME_MAX_CHARS);
        check_description(&mut errors, self.description.as_deref(), CATEGORY_DESCRIPTION_MAX_CHARS);
        errors.into_result()
    }

    /// Trim the name and drop a blank description.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self { name: self.name.trim().to_owned(), description: non_blank(self.description.as_deref()) }
    }
}

impl CategoryUpdate {
    /// # Errors
    ///
    /// Returns every rule the present fields break.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if let Some(name) = &self.name {
            check_name(&mut errors, name, CATEGORY_NAME_MAX_CHARS);
        }
        if let Some(description) = &self.description {
            check_description(&mut errors, description.as_deref(), CATEGORY_DESCRIPTION_MAX_CHARS);
        }
        errors.into_result()
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_owned()),
            description: self.description.map(|d| non_blank(d.as_deref())),
        }
    }
}

// =============================================================
// Products
// =============================================================

impl ProductInput {
    /// # Errors
    ///
    /// Returns every rule the body breaks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_name(&mut errors, &self.name, PRODUCT_NAME_MAX_CHARS);
        check_description(&mut errors, self.description.as_deref(), PRODUCT_DESCRIPTION_MAX_CHARS);
        check_price(&mut errors, self.price);
        check_stock(&mut errors, self.stock);
        errors.into_result()
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            description: non_blank(self.description.as_deref()),
            ..self
        }
    }
}

impl ProductUpdate {
    /// # Errors
    ///
    /// Returns every rule the present fields break.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if let Some(name) = &self.name {
            check_name(&mut errors, name, PRODUCT_NAME_MAX_CHARS);
        }
        if let Some(description) = &self.description {
            check_description(&mut errors, description.as_deref(), PRODUCT_DESCRIPTION_MAX_CHARS);
        }
        if let Some(price) = self.price {
            check_price(&mut errors, price);
        }
        if let Some(stock) = self.stock {
            check_stock(&mut errors, stock);
        }
        errors.into_result()
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_owned()),
            description: self.description.map(|d| non_blank(d.as_deref())),
            ..self
        }
    }
}

impl StockUpdate {
    /// # Errors
    ///
    /// Returns an error for negative stock.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_stock(&mut errors, self.stock);
        errors.into_result()
    }
}

/// Raw text of the product form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    /// Empty for "no category".
    pub category_id: String,
}

impl ProductForm {
    /// Pre-fill the form for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: format!("{:.2}", product.price),
            stock: product.stock.to_string(),
            category_id: product.category_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Parse and validate the form. Accepts `,` as the decimal separator.
    ///
    /// # Errors
    ///
    /// Returns every field that fails to parse or breaks a rule.
    pub fn parse(&self) -> Result<ProductInput, ValidationError> {
        let mut errors = ValidationError::default();

        let price = self.price.trim().replace(',', ".").parse::<f64>().ok().filter(|p| p.is_finite());
        if price.is_none() {
            errors.push(Field::Price, "Preço inválido");
        }
        let stock = self.stock.trim().parse::<i32>().ok();
        if stock.is_none() {
            errors.push(Field::Stock, "Estoque inválido");
        }
        let category_id = match self.category_id.trim() {
            "" => None,
            raw => {
                let parsed = Uuid::parse_str(raw).ok();
                if parsed.is_none() {
                    errors.push(Field::CategoryId, "Categoria inválida");
                }
                parsed
            }
        };

        check_name(&mut errors, &self.name, PRODUCT_NAME_MAX_CHARS);
        check_description(&mut errors, Some(&self.description), PRODUCT_DESCRIPTION_MAX_CHARS);
        if let Some(price) = price {
            check_price(&mut errors, price);
        }
        if let Some(stock) = stock {
            check_stock(&mut errors, stock);
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.errors.is_empty() => Ok(ProductInput {
                name: self.name.clone(),
                description: Some(self.description.clone()),
                price,
                stock,
                category_id,
            }
            .normalized()),
            _ => Err(errors),
        }
    }
}
