/// Credentials and access control
///
/// The whole chain lives here: [`password`] turns plaintext into Argon2id
/// digests at registration, [`jwt`] trades verified credentials for signed
/// HS256 tokens at login, [`middleware`] turns a bearer token back into a
/// request identity, and [`authorization`] decides what that identity may
/// do. Login failures and token failures are deliberately indistinguishable
/// to the caller.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
/// use taskdeck_shared::auth::jwt::{create_token, Claims};
/// use taskdeck_shared::models::user::Role;
/// use chrono::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new("user@example.com", Role::User, Duration::hours(24));
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod jwt;
pub mod middleware;
pub mod authorization;
