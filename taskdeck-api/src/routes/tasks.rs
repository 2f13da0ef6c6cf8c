/// Task management endpoints
///
/// All routes here sit behind the JWT gate. Tasks are created standalone or
/// directly under an account; ownership changes only through the explicit
/// assign operation.
///
/// # Endpoints
///
/// - `GET /api/tasks` - List tasks, optionally filtered by `?status=`
/// - `POST /api/tasks` - Create a task
/// - `GET /api/tasks/:id` - One task
/// - `PUT /api/tasks/:id` - Update title/description/status
/// - `DELETE /api/tasks/:id` - Delete a task
/// - `PUT /api/tasks/:id/assign` - Assign to an account (or to the caller)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use taskdeck_shared::{
    auth::middleware::CurrentUser,
    models::{
        task::{AssignOutcome, CreateTask, Task, TaskStatus, UpdateTask},
        user::User,
    },
};
use validator::Validate;

use super::ensure_not_blank;

/// Task representation
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assignee_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            assignee_id: task.assignee_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-text description
    pub description: Option<String>,

    /// Initial status; defaults to pending
    pub status: Option<TaskStatus>,

    /// Owning account; the task starts unassigned when omitted
    pub assignee_id: Option<i64>,
}

/// Update task request; absent fields are left untouched
///
/// The assignee is deliberately not here; ownership changes go through the
/// assign endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,
}

/// Query parameters for task listing
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    /// Status filter; one of `pending`, `in_progress`, `completed`
    pub status: Option<String>,
}

/// Assign task request
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    /// Target account; the caller's own account when omitted
    pub assignee_id: Option<i64>,
}

/// `GET /api/tasks` - lists tasks, optionally filtered by status
///
/// An unknown `?status=` value is a validation failure, not an empty list.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<TaskDto>>> {
    let tasks = match query.status.as_deref() {
        Some(raw) => {
            let status = TaskStatus::from_str(raw).map_err(|message| {
                ApiError::Validation(vec![ValidationErrorDetail {
                    field: "status".to_string(),
                    message,
                }])
            })?;
            Task::list_by_status(&state.db, status).await?
        }
        None => Task::list(&state.db).await?,
    };

    Ok(Json(tasks.into_iter().map(TaskDto::from).collect()))
}

/// `POST /api/tasks` - creates a task
///
/// A missing `assignee_id` target trips the store's foreign key and surfaces
/// as 404 naming the user.
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskDto>)> {
    req.validate()?;
    ensure_not_blank("title", &req.title)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            status: req.status,
            assignee_id: req.assignee_id,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, "Created task");

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// `GET /api/tasks/:id` - one task
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDto>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// `PUT /api/tasks/:id` - partial update of title, description and status
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskDto>> {
    req.validate()?;
    if let Some(ref title) = req.title {
        ensure_not_blank("title", title)?;
    }

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}

/// `DELETE /api/tasks/:id` - deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = id, "Deleted task");

    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/tasks/:id/assign` - hands a task to an account
///
/// An omitted `assignee_id` assigns the task to the caller. The 404 names
/// whichever entity was missing; on failure the task's previous owner is
/// unchanged.
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<Json<TaskDto>> {
    let assignee_id = match req.assignee_id {
        Some(target) => target,
        None => {
            User::find_by_email(&state.db, &current.email)
                .await?
                .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
                .id
        }
    };

    match Task::assign(&state.db, id, assignee_id).await? {
        AssignOutcome::Assigned(task) => {
            tracing::info!(task_id = task.id, assignee_id, "Assigned task");
            Ok(Json(task.into()))
        }
        AssignOutcome::TaskNotFound => Err(ApiError::NotFound("Task not found".to_string())),
        AssignOutcome::AssigneeNotFound => Err(ApiError::NotFound("User not found".to_string())),
    }
}
