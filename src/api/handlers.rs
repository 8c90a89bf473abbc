use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

use crate::config::Config;
use crate::errors::{ErrorBody, ErrorCode, SendError};
use crate::metrics::ACCOUNTS_TOTAL;
use crate::models::account::{normalize_email, Account, NewAccount};
use crate::sender::{JsonSender, ResponseRecorder};

/// Header carrying the administrative API key
pub const API_KEY_HEADER: &str = "x-api-key";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: RwLock<HashMap<String, Account>>,
    pub admin_api_key: Option<String>,
    pub instance_id: String,
}

impl AppStateInner {
    pub fn new(instance_id: impl Into<String>, admin_api_key: Option<String>) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            admin_api_key,
            instance_id: instance_id.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.server.instance_id.clone(),
            config.auth.admin_api_key.clone(),
        )
    }

    fn is_admin(&self, headers: &HeaderMap) -> bool {
        let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        matches!((&self.admin_api_key, provided), (Some(key), Some(given)) if key == given)
    }
}

/// Health check body
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub instance_id: String,
}

/// Build one response with a [`JsonSender`] bound to an in-memory stream.
///
/// If sending fails the status line may already be recorded, so the partial
/// response is dropped and an empty JSON 500 is returned instead. The sender
/// has already logged the failure.
fn respond<F>(status: StatusCode, build: F) -> Response
where
    F: FnOnce(JsonSender<&mut ResponseRecorder>) -> Result<(), SendError>,
{
    let mut recorder = ResponseRecorder::new();
    match build(JsonSender::new(&mut recorder, status)) {
        Ok(()) => recorder.into_response(),
        Err(e) => {
            debug!(status = status.as_u16(), stage = e.stage(), "Replacing failed response with 500");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, "application/json")],
            )
                .into_response()
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "healthy".to_string(),
        service: "json-sender".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instance_id: state.instance_id.clone(),
    };
    respond(StatusCode::OK, |s| s.send(Some(&body)))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    request_body = NewAccount,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Malformed request body", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Field validation failed", body = ErrorBody)
    )
)]
pub async fn create_account(State(state): State<AppState>, body: Bytes) -> Response {
    let request: NewAccount = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return respond(StatusCode::BAD_REQUEST, |s| {
                s.with_error(
                    ErrorCode::InvalidArgument,
                    format!("Invalid request body: {}", e),
                )
                .send_empty()
            });
        }
    };

    let field_errors = request.field_errors();
    if !field_errors.is_empty() {
        warn!(fields = ?field_errors.keys().collect::<Vec<_>>(), "Account validation failed");
        let single = match field_errors.first_key_value() {
            Some((field, message)) if field_errors.len() == 1 => Some((*field, *message)),
            _ => None,
        };
        return respond(StatusCode::UNPROCESSABLE_ENTITY, |s| {
            let s = match single {
                Some((field, message)) => {
                    s.with_field_error(ErrorCode::InvalidArgument, field, message)
                }
                None => s.with_fields_error(ErrorCode::InvalidArgument, field_errors),
            };
            s.send_empty()
        });
    }

    let account = request.into_account();
    let mut accounts = state.accounts.write().await;
    if accounts.contains_key(&account.email) {
        return respond(StatusCode::CONFLICT, |s| {
            s.with_error(ErrorCode::AlreadyExists, "Email already exists")
                .send_empty()
        });
    }

    accounts.insert(account.email.clone(), account.clone());
    ACCOUNTS_TOTAL.set(accounts.len() as i64);
    drop(accounts);

    info!(email = %account.email, "Account registered");
    respond(StatusCode::CREATED, |s| s.send(Some(&account)))
}

/// Look up an account by email
#[utoipa::path(
    get,
    path = "/accounts/{email}",
    tag = "accounts",
    params(
        ("email" = String, Path, description = "Account email")
    ),
    responses(
        (status = 200, description = "Account found", body = Account),
        (status = 404, description = "Account not found", body = ErrorBody)
    )
)]
pub async fn get_account(State(state): State<AppState>, Path(email): Path<String>) -> Response {
    let accounts = state.accounts.read().await;
    match accounts.get(&normalize_email(&email)) {
        Some(account) => respond(StatusCode::OK, |s| s.send(Some(account))),
        None => respond(StatusCode::NOT_FOUND, |s| {
            s.with_error(ErrorCode::NotFound, format!("Account not found: {}", email))
                .send_empty()
        }),
    }
}

/// Delete an account (requires the admin API key)
#[utoipa::path(
    delete,
    path = "/accounts/{email}",
    tag = "accounts",
    params(
        ("email" = String, Path, description = "Account email")
    ),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Missing or invalid API key", body = ErrorBody),
        (status = 404, description = "Account not found", body = ErrorBody)
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Response {
    if !state.is_admin(&headers) {
        warn!(email = %email, "Rejected unauthorized account deletion");
        return respond(StatusCode::UNAUTHORIZED, |s| {
            s.with_error(ErrorCode::NotAuthorized, "Missing or invalid API key")
                .send_empty()
        });
    }

    let mut accounts = state.accounts.write().await;
    match accounts.remove(&normalize_email(&email)) {
        Some(account) => {
            ACCOUNTS_TOTAL.set(accounts.len() as i64);
            info!(email = %account.email, "Account deleted");
            respond(StatusCode::NO_CONTENT, |s| s.send_empty())
        }
        None => respond(StatusCode::NOT_FOUND, |s| {
            s.with_error(ErrorCode::NotFound, format!("Account not found: {}", email))
                .send_empty()
        }),
    }
}

/// Fallback for unknown routes
pub async fn not_found(method: Method, uri: Uri) -> Response {
    respond(StatusCode::NOT_FOUND, |s| {
        s.with_error(
            ErrorCode::NotFound,
            format!("No route for {} {}", method, uri.path()),
        )
        .send_empty()
    })
}
