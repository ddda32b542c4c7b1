//! API Layer
//!
//! HTTP client and browser-storage helpers.

pub mod client;

pub use client::*;
