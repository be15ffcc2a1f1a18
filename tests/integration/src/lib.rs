//! Integration test utilities for the folio server
//!
//! Spawns the API on an in-memory store and drives it over HTTP and the
//! watch websocket.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
