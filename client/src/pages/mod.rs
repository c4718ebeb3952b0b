//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its data loading and mutations and delegates small widgets
//! to `components::shared`. Access control is applied by the route dispatcher
//! before a page mounts.

pub mod categories;
pub mod dashboard;
pub mod not_found;
pub mod product_form;
pub mod products;
