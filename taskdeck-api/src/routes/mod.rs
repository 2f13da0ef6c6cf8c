/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `users`: User management endpoints
/// - `tasks`: Task management endpoints
/// - `admin`: Administrative mirror of user and task management

pub mod health;
pub mod auth;
pub mod users;
pub mod tasks;
pub mod admin;

use crate::error::{ApiError, ValidationErrorDetail};

/// Rejects values that are empty or whitespace-only
///
/// The validator derive checks lengths and formats; blankness of required
/// text fields is checked here because a string of spaces passes a length
/// constraint.
pub(crate) fn ensure_not_blank(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(vec![ValidationErrorDetail {
            field: field.to_string(),
            message: format!("{} must not be blank", field),
        }]));
    }
    Ok(())
}
