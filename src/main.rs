//! Mergington High School Activities Portal
//!
//! Browser client for the school activities signup API, built with
//! Leptos (WASM).
//!
//! # Features
//!
//! - Activity list with live capacity and participant rosters
//! - Login / registration / logout against the REST auth endpoints
//! - Role-gated enrollment management for admins and activity managers
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles
//! to WebAssembly. User gestures become commands handled by a single
//! dispatcher (`dispatch`), which talks to the API and applies the
//! resulting state changes; the view re-derives everything from global
//! signals.

use leptos::*;

mod api;
mod app;
mod components;
mod dispatch;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
