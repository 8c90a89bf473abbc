//! Fluent JSON response builder

pub mod writer;

use axum::http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::{ErrorBody, ErrorCode, ErrorEnvelope, SendError, FIELD_ERRORS_DESCRIPTION};
use crate::metrics::{JSON_ERROR_RESPONSES_TOTAL, JSON_SEND_FAILURES_TOTAL};

pub use writer::{ResponseRecorder, ResponseWriter};

/// Builds and sends exactly one JSON response.
///
/// A sender is bound to a response stream and a status code. Zero or more
/// `with_*` calls stage an error envelope (the last call wins), then one of
/// [`send`](Self::send) or [`send_empty`](Self::send_empty) writes the
/// response. A sender must not be reused for a second response; the terminal
/// calls consume it.
///
/// ```
/// use axum::http::StatusCode;
/// use json_sender::errors::ErrorCode;
/// use json_sender::sender::{JsonSender, ResponseRecorder};
///
/// let mut rec = ResponseRecorder::new();
/// JsonSender::new(&mut rec, StatusCode::BAD_REQUEST)
///     .with_error(ErrorCode::InvalidArgument, "bad input")
///     .send_empty()
///     .unwrap();
///
/// assert_eq!(
///     rec.body(),
///     b"{\"error\":{\"status\":400,\"error\":\"INVALID_ARGUMENT\",\"description\":\"bad input\"}}\n"
/// );
/// ```
#[derive(Debug)]
pub struct JsonSender<W: ResponseWriter> {
    writer: W,
    status: StatusCode,
    error: Option<ErrorEnvelope>,
}

impl<W: ResponseWriter> JsonSender<W> {
    pub fn new(writer: W, status: StatusCode) -> Self {
        Self {
            writer,
            status,
            error: None,
        }
    }

    /// Status code this sender will write
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Currently staged error, if any
    pub fn staged_error(&self) -> Option<&ErrorEnvelope> {
        self.error.as_ref()
    }

    /// Stage an error response, replacing anything staged before
    pub fn with_error(mut self, code: ErrorCode, description: impl Into<String>) -> Self {
        self.error = Some(ErrorEnvelope::new(
            self.status.as_u16(),
            code,
            description,
        ));
        self
    }

    /// Stage a validation error for a single field
    pub fn with_field_error(
        self,
        code: ErrorCode,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.with_fields_error(code, [(field.into(), value.into())])
    }

    /// Stage a validation error for a set of fields
    pub fn with_fields_error<I, K, V>(mut self, code: ErrorCode, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut envelope = ErrorEnvelope::new(self.status.as_u16(), code, FIELD_ERRORS_DESCRIPTION);
        envelope.fields = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.error = Some(envelope);
        self
    }

    /// Write the response.
    ///
    /// A staged error always wins: `payload` is ignored when one is present.
    /// Without a staged error the payload is written as-is; with neither only
    /// the status and headers are written.
    pub fn send<T>(mut self, payload: Option<&T>) -> Result<(), SendError>
    where
        T: Serialize + ?Sized,
    {
        self.writer
            .set_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.writer.write_status(self.status);

        let status = self.status.as_u16();
        let encoded = match (self.error.take(), payload) {
            (Some(envelope), _) => {
                debug!(status, error = %envelope.error, "Sending error response");
                JSON_ERROR_RESPONSES_TOTAL
                    .with_label_values(&[envelope.error.as_str(), &status.to_string()])
                    .inc();
                encode_line(&ErrorBody { error: envelope }).map_err(SendError::EncodeEnvelope)
            }
            (None, Some(payload)) => encode_line(payload).map_err(SendError::EncodePayload),
            (None, None) => return Ok(()),
        };

        let result = encoded.and_then(|body| self.writer.write_body(&body).map_err(SendError::from));
        if let Err(e) = &result {
            error!(status, stage = e.stage(), "Failed to send JSON response: {}", e);
            JSON_SEND_FAILURES_TOTAL.with_label_values(&[e.stage()]).inc();
        }
        result
    }

    /// Write the response with no success payload
    pub fn send_empty(self) -> Result<(), SendError> {
        self.send::<()>(None)
    }
}

/// Encode a value followed by a newline. Nothing is produced on failure.
fn encode_line<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = serde_json::to_vec(value)?;
    buf.push(b'\n');
    Ok(buf)
}
