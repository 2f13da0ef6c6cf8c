/// Token issue and verification
///
/// Bearer tokens are HS256-signed JWTs carrying the user's email and role, so
/// a request's identity comes entirely out of the token with no database
/// lookup. Verification checks signature, expiry, not-before, and that the
/// issuer is ours.
///
/// `JwtError` keeps expired, malformed, and foreign-issuer tokens apart for
/// logs and tests. The HTTP layer must collapse all of them into one uniform
/// authentication failure so callers cannot probe which check rejected them.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskdeck_shared::models::user::Role;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new("user@example.com", Role::User, Duration::hours(24));
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, "user@example.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// Issuer claim stamped into and required of every token
pub const ISSUER: &str = "taskdeck";

/// Why a token could not be issued or accepted
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token signing failed: {0}")]
    CreateError(String),

    #[error("token rejected: {0}")]
    ValidationError(String),

    #[error("token expired")]
    Expired,

    #[error("token issued by someone else")]
    InvalidIssuer,
}

/// What a signed token asserts about its bearer
///
/// `sub` is the user's email (the stable human-facing identity) and `role` is
/// whatever the user held at login. A role change on the server does not
/// reach into already-issued tokens; it takes effect at the next login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Bearer's email address
    pub sub: String,

    /// Role captured at issue time
    pub role: Role,

    /// Always [`ISSUER`]
    pub iss: String,

    /// Issue instant, Unix seconds
    pub iat: i64,

    /// Expiry instant, Unix seconds
    pub exp: i64,

    /// Earliest acceptance instant, Unix seconds
    pub nbf: i64,
}

impl Claims {
    /// Builds claims valid from now until `expires_in` from now
    ///
    /// # Example
    ///
    /// ```
    /// use taskdeck_shared::auth::jwt::Claims;
    /// use taskdeck_shared::models::user::Role;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::new("user@example.com", Role::Admin, Duration::hours(1));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn new(email: impl Into<String>, role: Role, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: email.into(),
            role,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// True once the expiry instant has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Remaining lifetime, or `None` once expired
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Signs `claims` into a compact JWT with the given HS256 secret
///
/// # Errors
///
/// Returns [`JwtError::CreateError`] when encoding fails, which with HS256
/// only happens if the claims cannot be serialized.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token and hands back its claims
///
/// Signature, `exp`, `nbf`, and issuer are all enforced. The error sorts the
/// rejection so callers can log an expired token differently from a forged
/// one.
///
/// # Errors
///
/// [`JwtError::Expired`] for an out-of-date token, [`JwtError::InvalidIssuer`]
/// for a foreign one, [`JwtError::ValidationError`] for everything else.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
