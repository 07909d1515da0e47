//! # client
//!
//! Leptos + WASM frontend. Renders the home, login, dashboard, and not-found
//! pages, keeps the signed-in user in an auth context fed by the identity
//! provider, and gates the dashboard behind [`components::private_route`].
//!
//! Browser-only behavior (HTTP calls, the sign-in popup) is compiled under the
//! `hydrate` feature; the `ssr` build renders the shell for the server.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
