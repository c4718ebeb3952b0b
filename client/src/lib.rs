//! # client
//!
//! Leptos + WASM admin console for the inventory catalog.
//!
//! This crate contains the route table, pages, components, REST wrappers and
//! the browser side of the session: an OpenID-Connect provider driven through
//! redirects and a hidden silent-check iframe. Session state itself lives in
//! the `session` crate; field rules and wire types live in `catalog`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

/// WASM entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
