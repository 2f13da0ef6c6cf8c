/// One error type for every handler
///
/// Handlers return `Result<T, ApiError>`; the `IntoResponse` impl turns each
/// variant into its HTTP status and a JSON `{error, message}` envelope, so no
/// handler builds an error response by hand.
///
/// Authentication failures deserve a note: every 401 carries the same body,
/// whether the token was missing, malformed, expired, signed with the wrong
/// key, or login credentials were simply wrong. The specific reason is logged
/// at debug level and never surfaced to the caller.
///
/// # Example
///
/// ```
/// use taskdeck_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("Task not found".to_string()))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shorthand for handler return types
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with
#[derive(Debug)]
pub enum ApiError {
    /// Request validation failed (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Authentication failed (401); always rendered with the same body
    Unauthorized,

    /// Authenticated but not permitted (403)
    Forbidden(String),

    /// Not found (404); the message names the missing entity
    NotFound(String),

    /// Duplicate identity (409), e.g. an already-registered email
    Conflict(String),

    /// Unexpected failure (500); logged, never detailed to the caller
    Internal(String),
}

/// One rejected field inside a 400 body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

/// The JSON envelope every error renders as
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. "not_found", "authentication_failure"
    pub error: String,

    /// Human-readable text
    pub message: String,

    /// Present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized => write!(f, "Authentication required"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_failure",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "authentication_failure",
                "Authentication required".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "authorization_failure",
                msg,
                None,
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "not_found",
                msg,
                None,
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "duplicate_identity",
                msg,
                None,
            ),
            ApiError::Internal(msg) => {
                // The caller gets a generic body; the detail goes to the log
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Constraint names here are the ones the migrations create: the unique
/// index on users.email and the tasks -> users foreign key.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => match db_err.constraint() {
                Some("users_email_key") => {
                    ApiError::Conflict("Email already in use".to_string())
                }
                Some("tasks_assignee_id_fkey") => {
                    ApiError::NotFound("User not found".to_string())
                }
                Some(constraint) => {
                    ApiError::Conflict(format!("Constraint violation: {}", constraint))
                }
                None => ApiError::Internal(format!("Database error: {}", db_err)),
            },
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::Validation(errors)
    }
}

impl From<taskdeck_shared::auth::authorization::AuthzError> for ApiError {
    fn from(err: taskdeck_shared::auth::authorization::AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

/// Hashing failures are server bugs or misconfiguration, never user error
impl From<taskdeck_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskdeck_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Every token failure collapses into the uniform 401
impl From<taskdeck_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskdeck_shared::auth::jwt::JwtError) -> Self {
        tracing::debug!(reason = %err, "Token operation failed");
        ApiError::Unauthorized
    }
}
