/// Administrative endpoints
///
/// A mirror of user and task management mounted under `/api/admin`. The
/// router puts an admin role gate in front of every route here, so handlers
/// can assume the caller is an admin.
///
/// # Endpoints
///
/// - `GET /api/admin/users` - List all accounts
/// - `GET /api/admin/users/:id` - Account with its owned tasks
/// - `DELETE /api/admin/users/:id` - Delete any account
/// - `PUT /api/admin/users/:id/role` - Set an account's role
/// - `GET /api/admin/tasks` - List all tasks
/// - `GET /api/admin/tasks/:id` - One task
/// - `DELETE /api/admin/tasks/:id` - Delete any task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdeck_shared::models::{
    task::Task,
    user::{Role, User},
};

use super::{
    tasks::TaskDto,
    users::{UserDetailDto, UserDto},
};

/// Role assignment request
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    /// New role; `user` or `admin`
    pub role: Role,
}

/// `GET /api/admin/users`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserDto>>> {
    let users = User::list(&state.db).await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// `GET /api/admin/users/:id`
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

/// `DELETE /api/admin/users/:id`
///
/// The account's owned tasks are removed by the store cascade.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = id, "Account deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/admin/users/:id/role` - promotes or demotes an account
pub async fn set_user_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SetRoleRequest>,
) -> ApiResult<Json<UserDto>> {
    let user = User::update_role(&state.db, id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = user.id, role = %user.role, "Role updated");

    Ok(Json(user.into()))
}

/// `GET /api/admin/tasks`
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskDto>>> {
    let tasks = Task::list(&state.db).await?;
    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

/// `GET /api/admin/tasks/:id`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDto>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// `DELETE /api/admin/tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = id, "Task deleted by admin");

    Ok(StatusCode::NO_CONTENT)
}
