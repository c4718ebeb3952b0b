//! Shared inventory schema for the admin console and its API server.
//!
//! This crate owns the JSON representation of categories, products, users and
//! the dashboard aggregate, plus the field rules both sides enforce. The console
//! validates forms with the same functions the server runs on request bodies,
//! so a value rejected in the browser is rejected by the API for the same
//! reason and with the same message.

pub mod dashboard;
pub mod model;
pub mod stock;
pub mod user;
pub mod validate;

pub use dashboard::{CategorySummary, DashboardData, ProductLowStock, UNCATEGORIZED_LABEL};
pub use model::{Category, CategoryInput, CategoryUpdate, Product, ProductInput, ProductUpdate, StockUpdate};
pub use stock::{LOW_STOCK_THRESHOLD, StockLevel, is_low_stock};
pub use user::{User, UserInput, UserUpdate};
pub use validate::{Field, FieldError, ProductForm, ValidationError};
