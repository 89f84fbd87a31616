//! Sidecar for the Scribe browser extension: turns raw DOM events into a
//! recorded action log and renders that log as a Playwright test.

pub mod api;
pub mod codegen;
pub mod config;
pub mod dom;
pub mod error;
pub mod models;
pub mod recording;
