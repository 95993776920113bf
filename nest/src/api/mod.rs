//! HTTP API module.
//!
//! The axum server, its Basic-auth extractor and the request/response types.

pub mod auth;
pub mod server;
pub mod types;

pub use auth::Authenticated;
pub use server::{router, start_server, AppState};
pub use types::*;
