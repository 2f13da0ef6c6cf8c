/// User management endpoints
///
/// All routes here sit behind the JWT gate. Deleting by id is additionally
/// restricted to admins; deleting without an id removes the caller's own
/// account.
///
/// # Endpoints
///
/// - `GET /api/users` - List all accounts
/// - `GET /api/users/:id` - Account with its owned tasks
/// - `PUT /api/users/:id` - Update username/email/password
/// - `DELETE /api/users` - Delete the caller's own account
/// - `DELETE /api/users/:id` - Delete any account (admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{
        authorization::{authorize, AccessPolicy},
        middleware::CurrentUser,
        password,
    },
    models::{
        task::Task,
        user::{Role, UpdateUser, User},
    },
};
use validator::Validate;

use super::{ensure_not_blank, tasks::TaskDto};

/// User representation; the password digest never leaves the store layer
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User with owned tasks embedded
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDetailDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tasks: Vec<TaskDto>,
}

impl UserDetailDto {
    pub fn new(user: User, tasks: Vec<Task>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
            tasks: tasks.into_iter().map(TaskDto::from).collect(),
        }
    }
}

/// Update user request; absent fields are left untouched
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password; re-hashed before storing
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// `GET /api/users` - lists all accounts as sanitized DTOs
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserDto>>> {
    let users = User::list(&state.db).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// `GET /api/users/:id` - one account with its owned tasks embedded
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserDetailDto>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let tasks = Task::list_by_assignee(&state.db, user.id).await?;

    Ok(Json(UserDetailDto::new(user, tasks)))
}

/// `PUT /api/users/:id` - partial update of username, email and password
///
/// Changing the email to one another account holds yields 409.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    req.validate()?;
    if let Some(ref username) = req.username {
        ensure_not_blank("username", username)?;
    }

    let password_hash = match req.password {
        Some(ref plaintext) => Some(password::hash_password(plaintext)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// `DELETE /api/users` - deletes the caller's own account
///
/// The account is resolved from the token's email claim; its owned tasks go
/// with it via the store cascade.
pub async fn delete_own_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    let deleted = User::delete_by_email(&state.db, &current.email).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!("Account self-deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/users/:id` - deletes any account by id (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authorize(AccessPolicy::Role(Role::Admin), current.role)?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "Account deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
