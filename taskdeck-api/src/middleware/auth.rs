/// Role gate for the admin subtree
///
/// The JWT middleware runs first and inserts `CurrentUser` into request
/// extensions; this gate then checks the caller's role against the admin
/// requirement and rejects mismatches with 403 before any handler runs.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use taskdeck_api::middleware::auth::admin_only;
///
/// async fn admin_dashboard() -> &'static str {
///     "admins only"
/// }
///
/// let app: Router = Router::new()
///     .route("/admin", get(admin_dashboard))
///     .route_layer(axum::middleware::from_fn(admin_only));
/// ```

use axum::{extract::Request, middleware::Next, response::Response};
use taskdeck_shared::auth::{
    authorization::{authorize, AccessPolicy},
    middleware::CurrentUser,
};
use taskdeck_shared::models::user::Role;

use crate::error::ApiError;

/// Rejects requests whose caller does not hold the admin role
///
/// A missing `CurrentUser` extension means the route was mounted outside
/// the JWT gate; that is answered with 401 rather than a panic.
pub async fn admin_only(req: Request, next: Next) -> Result<Response, ApiError> {
    let role = req
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.role)
        .ok_or(ApiError::Unauthorized)?;

    authorize(AccessPolicy::Role(Role::Admin), role)?;

    Ok(next.run(req).await)
}
