use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::codes::ErrorCode;

/// Description staged by the field-level error helpers
pub const FIELD_ERRORS_DESCRIPTION: &str = "One or more fields raised validation errors.";

/// Normalized error details sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    /// HTTP status code of the response
    pub status: u16,
    /// Symbolic error code
    pub error: ErrorCode,
    /// Human-readable description (omitted when empty)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Per-field validation messages (omitted when empty)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl ErrorEnvelope {
    pub fn new(status: u16, error: ErrorCode, description: impl Into<String>) -> Self {
        Self {
            status,
            error,
            description: description.into(),
            fields: BTreeMap::new(),
        }
    }
}

/// Top-level error body: `{"error": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorEnvelope,
}
