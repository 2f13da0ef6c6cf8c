/// The authentication gate
///
/// Axum middleware that pulls the bearer token off the Authorization header,
/// verifies it, and plants a [`CurrentUser`] in request extensions. Handlers
/// behind the gate never run for unauthenticated requests, and the identity
/// they see comes purely from the token's signed claims, with no database
/// lookup.
///
/// # Rejection
///
/// A missing header, a non-Bearer header, a malformed token, a bad signature,
/// and an expired token all produce the same 401 response body. Collapsing
/// them denies callers an oracle for probing which check failed; the reason
/// is still logged.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskdeck_shared::auth::middleware::{create_jwt_middleware, CurrentUser};
///
/// async fn protected_handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, JwtError};
use crate::models::user::Role;

/// Identity of the authenticated caller, added to request extensions
///
/// Recomputed from the token on every request and never persisted. Handlers
/// extract it with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskdeck_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("User: {} ({})", user.email, user.role)
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Email address from the token's subject claim
    pub email: String,

    /// Role from the token's role claim
    pub role: Role,
}

/// Error type for the authentication gate
///
/// Variants stay distinct for logging and tests, but every one of them
/// renders as the same 401 response.
#[derive(Debug)]
pub enum AuthError {
    /// Missing Authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat,

    /// Token validation failed (bad signature, expired, malformed, wrong issuer)
    InvalidToken(JwtError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(reason = ?self, "Rejected unauthenticated request");

        // One body for every rejection; callers cannot tell which check failed
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "authentication_failure",
                "message": "Authentication required",
            })),
        )
            .into_response()
    }
}

/// Checks the `Authorization: Bearer <token>` header and either forwards the
/// request with [`CurrentUser`] attached or answers 401
///
/// # Errors
///
/// Any [`AuthError`]: header absent, header not a Bearer scheme, or the
/// token itself rejected by [`validate_token`].
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &secret).map_err(AuthError::InvalidToken)?;

    req.extensions_mut().insert(CurrentUser {
        email: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Captures the signing secret into a closure that
/// `axum::middleware::from_fn` accepts
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use taskdeck_shared::auth::middleware::create_jwt_middleware;
///
/// let app: Router = Router::new()
///     .route("/protected", get(|| async { "OK" }))
///     .layer(middleware::from_fn(create_jwt_middleware("secret")));
/// ```
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
