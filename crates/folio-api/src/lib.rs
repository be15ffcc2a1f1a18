//! # folio-api
//!
//! REST API and live-watch websocket built with the Axum framework.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_with_listener};
pub use state::AppState;
