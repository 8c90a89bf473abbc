//! Structured JSON responses and standardized error envelopes for HTTP handlers.
//!
//! The core is [`sender::JsonSender`], a single-use builder bound to a
//! response stream and status code, and [`errors::ErrorCode`], the fixed
//! table of symbolic error strings. The `api` module is an account service
//! built on top of it.

pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod sender;

pub use errors::{ErrorCode, SendError};
pub use sender::{JsonSender, ResponseRecorder, ResponseWriter};
