use axum::{
    body::Body,
    http::{header::HeaderName, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::io;

/// Writable HTTP response stream
pub trait ResponseWriter {
    /// Set a response header, replacing any previous value
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);

    /// Write the status line. Headers set afterwards are not guaranteed to be sent.
    fn write_status(&mut self, status: StatusCode);

    /// Append bytes to the response body
    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        (**self).set_header(name, value)
    }

    fn write_status(&mut self, status: StatusCode) {
        (**self).write_status(status)
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_body(bytes)
    }
}

/// In-memory response stream.
///
/// Records everything written to it and converts into an axum [`Response`].
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written so far, if any
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl ResponseWriter for ResponseRecorder {
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn write_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write_body(&mut self, bytes: &[u8]) -> io::Result<()> {
        // Like a real server, writing a body implies 200 if no status was written
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(bytes);
        Ok(())
    }
}

impl IntoResponse for ResponseRecorder {
    fn into_response(self) -> Response {
        let status = self.status.unwrap_or(StatusCode::OK);
        let mut response = (status, Body::from(self.body)).into_response();
        response.headers_mut().extend(self.headers);
        response
    }
}
