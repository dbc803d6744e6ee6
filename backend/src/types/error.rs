//! Universal error handling for the API

use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use backend_storage::user_account::UserAccountStorageError;
use schemars::JsonSchema;
use serde::Serialize;
use telegram_init_data::{InitDataError, MalformedIdentityError};

/// API error response envelope shared by every endpoint
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: Cow<'static, str>,
    /// Human-readable error message
    pub message: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(
        status: StatusCode,
        code: &'static str,
        msg: &'static str,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody {
                    code: Cow::Borrowed(code),
                    message: msg,
                },
            },
        }
    }

    /// Create a `400 Bad Request` error for a failed request body validation
    ///
    /// The code comes from the validation rule's message, e.g. `invalid_email`.
    #[must_use]
    pub fn validation(code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            inner: ApiErrorResponse {
                allow_retry: false,
                error: ErrorBody {
                    code: code.into(),
                    message: "Request validation failed",
                },
            },
        }
    }

    /// HTTP status of the error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.inner.error.code
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

impl From<InitDataError> for AppError {
    fn from(err: InitDataError) -> Self {
        match err {
            InitDataError::MalformedIdentity(err) => err.into(),
            InitDataError::MissingHash
            | InitDataError::InvalidSignature
            | InitDataError::InvalidAuthDate
            | InitDataError::Stale { .. } => {
                tracing::debug!("Rejected init data: {err}");
                Self::new(
                    StatusCode::UNAUTHORIZED,
                    "invalid_init_data",
                    "Telegram init data is invalid or expired",
                    false,
                )
            }
        }
    }
}

/// A signed payload without a usable user means the client and server
/// disagree on the launch data format
impl From<MalformedIdentityError> for AppError {
    fn from(err: MalformedIdentityError) -> Self {
        tracing::error!("Signed init data carries a malformed identity: {err}");
        Self::new(
            StatusCode::BAD_REQUEST,
            "malformed_identity",
            "Telegram init data does not contain a valid user",
            false,
        )
    }
}

impl From<UserAccountStorageError> for AppError {
    fn from(err: UserAccountStorageError) -> Self {
        use UserAccountStorageError::{
            DynamoDbGetError, DynamoDbPutError, DynamoDbQueryError, SerializationError,
            UserAccountExists,
        };

        match &err {
            UserAccountExists => Self::new(
                StatusCode::CONFLICT,
                "already_registered",
                "An account already exists for this Telegram user",
                false,
            ),
            DynamoDbPutError(_) | DynamoDbGetError(_) | DynamoDbQueryError(_) => {
                tracing::error!("Dynamo DB error: {err}");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "database_error",
                    "Database temporarily unavailable",
                    true,
                )
            }
            SerializationError(msg) => {
                tracing::error!("User account serialization error: {msg}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                    false,
                )
            }
        }
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
