/// Authorization policies and the single authorize check
///
/// Every protected route declares what it requires as an [`AccessPolicy`]
/// value, and [`authorize`] is the one place that evaluates a policy against
/// the caller's role. Authorization runs after the authentication gate, so a
/// failure here means "we know who you are, and you may not do this" and maps
/// to 403, distinct from the gate's 401.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::{authorize, AccessPolicy};
/// use taskdeck_shared::models::user::Role;
///
/// // Any authenticated caller
/// assert!(authorize(AccessPolicy::Authenticated, Role::User).is_ok());
///
/// // Admin-only
/// assert!(authorize(AccessPolicy::Role(Role::Admin), Role::User).is_err());
/// assert!(authorize(AccessPolicy::Role(Role::Admin), Role::Admin).is_ok());
/// ```

use crate::models::user::Role;

/// What a route requires of its caller
///
/// Public routes are not expressed here; they are mounted outside the
/// authentication gate and never reach an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any authenticated caller, regardless of role
    Authenticated,

    /// Caller must hold at least the given role
    Role(Role),
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role does not meet the route's requirement
    #[error("Requires the {required} role, but the caller is {actual}")]
    InsufficientRole { required: Role, actual: Role },
}

/// Evaluates an access policy against the caller's role
///
/// This is the only place policies are interpreted; routes declare a policy
/// value and call (or are wrapped by middleware that calls) this function.
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` naming the required and actual
/// roles when the policy is not met.
pub fn authorize(policy: AccessPolicy, role: Role) -> Result<(), AuthzError> {
    match policy {
        AccessPolicy::Authenticated => Ok(()),
        AccessPolicy::Role(required) => {
            if role.satisfies(required) {
                Ok(())
            } else {
                Err(AuthzError::InsufficientRole {
                    required,
                    actual: role,
                })
            }
        }
    }
}
