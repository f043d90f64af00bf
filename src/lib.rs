//! # homenuvo-web
//!
//! Leptos + WASM front-end for the HomeNuvo marketing site and dashboard,
//! backed by a hosted auth/data service.
//!
//! The crate's core is the client-side auth state machine in `state`: a
//! single shared store derived from the identity query, route guards that
//! redirect on auth transitions, and the single-flight login submission.
//! Pages and components only read that state and invoke its actions.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Browser entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
