//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the console chrome (sidebar layout, access gate) and the
//! small status widgets shared by every page, reading shared state from Leptos
//! context providers.

pub mod layout;
pub mod protected_route;
pub mod shared;
