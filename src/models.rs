//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains all request/response structures used by the API.

pub mod department;
pub mod employee;
pub mod grade;
pub mod salary;

// Re-export commonly used types
pub use department::*;
pub use employee::*;
pub use grade::*;
pub use salary::*;

use serde::Serialize;

/// Message-only response (no data)
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
