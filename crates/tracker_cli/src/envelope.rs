//! JSON response envelopes.
//!
//! # Invariants
//! - Success bodies are `{ "data": ... }`.
//! - Failures are `{ "error": ..., "code": ... }` with the core's HTTP-style
//!   status.

use log::warn;
use serde::Serialize;
use serde_json::{json, Value};
use tracker_core::{CoreError, CoreResult};

/// Status plus JSON body for one route call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status: 200,
                body: json!({ "data": data }),
            },
            Err(err) => Self {
                status: 500,
                body: json!({ "error": err.to_string(), "code": "SERIALIZATION_ERROR" }),
            },
        }
    }

    pub fn from_error(err: &CoreError) -> Self {
        if !err.is_validation() {
            warn!(
                "event=route_error module=cli status=error error_code={}",
                err.code()
            );
        }
        Self {
            status: err.http_status(),
            body: json!({ "error": err.to_string(), "code": err.code() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Wraps a core result into an envelope.
pub fn respond<T: Serialize>(result: CoreResult<T>) -> ApiResponse {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(err) => ApiResponse::from_error(&err),
    }
}
