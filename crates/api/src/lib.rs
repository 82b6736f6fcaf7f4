//! ToastLab admin API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! the binary entrypoint and any future integration harness share the same
//! router construction.

pub mod config;
pub mod error;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
