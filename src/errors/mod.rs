//! Error codes, the error envelope, and send failures

pub mod codes;
pub mod envelope;

use thiserror::Error;

pub use codes::{resolve_raw, ErrorCode};
pub use envelope::{ErrorBody, ErrorEnvelope, FIELD_ERRORS_DESCRIPTION};

/// Failure of the terminal send operation.
///
/// The status line and `Content-Type` header have already been written when
/// any of these is returned.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("could not encode error response: {0}")]
    EncodeEnvelope(#[source] serde_json::Error),

    #[error("could not encode json response: {0}")]
    EncodePayload(#[source] serde_json::Error),

    #[error("could not write response body: {0}")]
    Write(#[from] std::io::Error),
}

impl SendError {
    /// Short label used for logs and metrics
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EncodeEnvelope(_) => "encode_envelope",
            Self::EncodePayload(_) => "encode_payload",
            Self::Write(_) => "write",
        }
    }
}
