//! Vibe Flow web server and UI.
//!
//! This crate provides the Leptos-based site: public pages, the sign-in
//! page, and member and admin pages behind route guards. On the server it
//! also talks to the hosted identity backend on behalf of the browser.

#![allow(non_snake_case)]

pub mod app;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod pages;
pub mod session;
pub mod types;
pub mod user;

#[cfg(feature = "ssr")]
pub mod auth;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod server_helpers;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
