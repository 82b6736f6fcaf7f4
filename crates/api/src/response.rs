//! Shared response envelope types for API handlers.
//!
//! List/detail responses use a `{ "data": ... }` envelope; trigger-style
//! endpoints return their bare count/ack maps.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
