/// The two endpoints anyone can call without a token
///
/// `POST /api/auth/register` creates an account; `POST /api/auth/login`
/// trades credentials for a bearer token. Everything else in the API sits
/// behind the token these hand out.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

use super::{ensure_not_blank, users::UserDto};

/// Body of `POST /api/auth/register`
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    /// Email address; unique across all accounts
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password; stored only as an Argon2id digest
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// What a successful login returns
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for the Authorization header
    pub token: String,

    /// Token lifetime in seconds
    pub expires_in: u64,
}

/// Register a new account
///
/// New accounts always get the `user` role; promotion happens through the
/// admin role endpoint.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "John Doe",
///   "email": "johndoe@example.com",
///   "password": "12345678"
/// }
/// ```
///
/// # Errors
///
/// 400 for a rejected body, 409 when the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserDto>> {
    req.validate()?;
    ensure_not_blank("username", &req.username)?;

    let password_hash = password::hash_password(&req.password)?;

    // A duplicate email trips the store's unique constraint and surfaces
    // as 409 through the sqlx error conversion
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role: None,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Registered new account");

    Ok(Json(user.into()))
}

/// Login and receive a bearer token
///
/// The token's claims carry the account's email and role; handlers derive
/// the caller's identity from them on every request.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "johndoe@example.com",
///   "password": "12345678"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "token": "eyJ...",
///   "expires_in": 86400
/// }
/// ```
///
/// # Errors
///
/// 400 for a rejected body; 401 for an unknown email or a wrong password,
/// and the response does not say which.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = match User::find_by_email(&state.db, &req.email).await? {
        Some(user) => user,
        None => {
            tracing::debug!("Login attempt for unknown email");
            return Err(ApiError::Unauthorized);
        }
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::Unauthorized);
    }

    let claims = jwt::Claims::new(user.email.clone(), user.role, state.config.jwt.token_ttl());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = user.id, "Login succeeded");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.config.jwt.token_ttl_secs,
    }))
}
