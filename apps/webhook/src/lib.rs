//! Pagebot webhook service library.
//!
//! The binary in `main.rs` is a thin wrapper; the router and its handlers live
//! here so integration tests can drive them directly.

pub mod bot;
pub mod http;

pub use bot::EchoBot;
pub use http::{build_router, AppState};
