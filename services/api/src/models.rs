//! API models for request and response payloads

use serde::{Deserialize, Serialize};

pub mod history;
pub mod user;

/// Response for operations that only report an outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    /// A successful outcome with the given message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}
