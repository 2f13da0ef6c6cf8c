/// To-do items and their store operations
///
/// A task belongs to at most one user. The cascading foreign key means a
/// task's assignee can vanish out from under it only by taking the task
/// along; there is no orphaned-assignee state.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     assignee_id BIGINT REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{Task, CreateTask, TaskStatus};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Water the plants".to_string(),
///     description: Some("The ones on the balcony".to_string()),
///     status: Some(TaskStatus::Pending),
///     assignee_id: None,
/// }).await?;
///
/// // Hand it to user 1
/// Task::assign(&pool, task.id, 1).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;

/// Column list shared by every query that reads a full row
const TASK_COLUMNS: &str = "id, title, description, status, assignee_id, created_at, updated_at";

/// Where a task stands
///
/// Stored in PostgreSQL as the `task_status` enum type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started; the default at creation
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Returns the wire/database representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!(
                "unknown task status '{}', expected one of: pending, in_progress, completed",
                other
            )),
        }
    }
}

/// A stored to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Database-assigned, immutable
    pub id: i64,

    /// Short title, non-blank
    pub title: String,

    /// Free-text detail
    pub description: Option<String>,

    pub status: TaskStatus,

    /// Owning user, or `None` while unassigned
    ///
    /// When present it references an existing user; the foreign key cascades
    /// on user deletion.
    pub assignee_id: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,

    pub description: Option<String>,

    /// `None` means `TaskStatus::Pending`
    pub status: Option<TaskStatus>,

    /// Assign at creation; the user must exist if given
    pub assignee_id: Option<i64>,
}

/// Partial update; only the `Some` fields change
///
/// Ownership is deliberately absent here. Reassignment goes through
/// [`Task::assign`], which checks both sides exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Result of an assignment attempt
///
/// Assignment touches two rows, so a plain `Option` cannot say which side
/// was missing. Callers need to know in order to report the right entity.
#[derive(Debug)]
pub enum AssignOutcome {
    /// The task was assigned; holds the updated row
    Assigned(Task),

    /// No task with the given ID exists
    TaskNotFound,

    /// No user with the given ID exists
    AssigneeNotFound,
}

impl Task {
    /// Inserts a task and returns the stored row
    ///
    /// # Errors
    ///
    /// An `assignee_id` pointing at no user surfaces as a foreign-key
    /// database error (`tasks_assignee_id_fkey`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskdeck_shared::models::task::{Task, CreateTask};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let task = Task::create(&pool, CreateTask {
    ///     title: "Write release notes".to_string(),
    ///     description: None,
    ///     status: None,
    ///     assignee_id: Some(1),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO tasks (title, description, status, assignee_id) \
             VALUES ($1, $2, $3, $4) RETURNING {TASK_COLUMNS}"
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status.unwrap_or_default())
            .bind(data.assignee_id)
            .fetch_one(pool)
            .await
    }

    /// Looks up a task by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks, ordered by id
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");

        sqlx::query_as::<_, Task>(&sql).fetch_all(pool).await
    }

    /// Tasks in one status, ordered by id
    pub async fn list_by_status(
        pool: &PgPool,
        status: TaskStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE status = $1 ORDER BY id");

        sqlx::query_as::<_, Task>(&sql)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Tasks held by one user, ordered by id
    ///
    /// Shapes user detail responses (a user plus their tasks).
    pub async fn list_by_assignee(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE assignee_id = $1 ORDER BY id");

        sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Applies a partial update to title, description, or status, touching
    /// `updated_at`
    ///
    /// Returns the fresh row, or `None` when no task has this id.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // SET clause grows one placeholder per present field; binds below
        // walk the fields in the same order
        let mut sets = String::from("updated_at = NOW()");
        let mut placeholder = 2;
        for (present, column) in [
            (data.title.is_some(), "title"),
            (data.description.is_some(), "description"),
            (data.status.is_some(), "status"),
        ] {
            if present {
                sets.push_str(&format!(", {column} = ${placeholder}"));
                placeholder += 1;
            }
        }

        let sql = format!("UPDATE tasks SET {sets} WHERE id = $1 RETURNING {TASK_COLUMNS}");

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(id);
        if let Some(title) = data.title {
            query = query.bind(title);
        }
        if let Some(description) = data.description {
            query = query.bind(description);
        }
        if let Some(status) = data.status {
            query = query.bind(status);
        }

        query.fetch_optional(pool).await
    }

    /// Hands a task to a user
    ///
    /// Runs in a single transaction: both existence checks and the update
    /// commit together, so a concurrent delete cannot leave the task pointing
    /// at a vanished user. On failure the task's current assignee is
    /// untouched and the outcome names which entity was missing.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskdeck_shared::models::task::{Task, AssignOutcome};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// match Task::assign(&pool, 7, 1).await? {
    ///     AssignOutcome::Assigned(task) => println!("assignee: {:?}", task.assignee_id),
    ///     AssignOutcome::TaskNotFound => println!("no such task"),
    ///     AssignOutcome::AssigneeNotFound => println!("no such user"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn assign(
        pool: &PgPool,
        task_id: i64,
        user_id: i64,
    ) -> Result<AssignOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let task_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tasks WHERE id = $1)")
                .bind(task_id)
                .fetch_one(&mut *tx)
                .await?;

        if !task_exists {
            // Dropping the transaction rolls it back
            return Ok(AssignOutcome::TaskNotFound);
        }

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        if !user_exists {
            return Ok(AssignOutcome::AssigneeNotFound);
        }

        let sql = format!(
            "UPDATE tasks SET assignee_id = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {TASK_COLUMNS}"
        );

        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(AssignOutcome::Assigned(task))
    }

    /// Removes a task by id, reporting whether a row was actually removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
