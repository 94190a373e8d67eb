//! HTTP server for the dubbing pipeline.
//!
//! The binary lives in `main.rs`; everything else is exported here so
//! integration tests can build the router in-process.

pub mod api;
pub mod metrics;
pub mod state;
