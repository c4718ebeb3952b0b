//! Reactive state shared through Leptos context.

pub mod auth;
pub mod catalog;
