use utoipa::OpenApi;

use crate::api::handlers::HealthResponse;
use crate::errors::{ErrorBody, ErrorCode, ErrorEnvelope};
use crate::models::account::{Account, NewAccount};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "JSON Sender Account Service",
        version = "0.1.0",
        description = "Account registration service whose responses are all produced by the JSON sender. Errors share one envelope: {\"error\": {status, error, description, fields}}.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::create_account,
        crate::api::handlers::get_account,
        crate::api::handlers::delete_account,
    ),
    components(
        schemas(
            HealthResponse,
            Account,
            NewAccount,
            ErrorBody,
            ErrorEnvelope,
            ErrorCode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account registration endpoints"),
    )
)]
pub struct ApiDoc;
