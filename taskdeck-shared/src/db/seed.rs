/// Demo seed data for local development
///
/// Inserts a small, well-known fixture set so a fresh database is immediately
/// usable: one ordinary user, one admin, and one in-progress task assigned to
/// the user. Seeding is idempotent; if the demo user already exists nothing
/// is written. The API server only calls this when `SEED_DEMO_DATA=true`.
///
/// # Fixtures
///
/// | Username | Email               | Password | Role  |
/// |----------|---------------------|----------|-------|
/// | John Doe | johndoe@example.com | 12345678 | user  |
/// | Jane Doe | janedoe@example.com | admin123 | admin |
///
/// Plus "Task 1" (in progress), assigned to John Doe.

use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::password::{hash_password, PasswordError};
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::{CreateUser, Role, User};

/// Email of the demo ordinary user; also the idempotency sentinel
pub const DEMO_USER_EMAIL: &str = "johndoe@example.com";

/// Email of the demo admin
pub const DEMO_ADMIN_EMAIL: &str = "janedoe@example.com";

/// Error type for seeding operations
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Hashing a fixture password failed
    #[error("Password hashing error: {0}")]
    Password(#[from] PasswordError),
}

/// Seeds the demo fixtures if they are not already present
///
/// # Errors
///
/// Returns an error if a fixture insert or password hash fails. A partially
/// seeded database is repaired on the next run only if the demo user itself
/// is missing; the sentinel is the first row written.
pub async fn seed_demo_data(pool: &PgPool) -> Result<(), SeedError> {
    if User::exists_by_email(pool, DEMO_USER_EMAIL).await? {
        debug!("Demo data already present, skipping seed");
        return Ok(());
    }

    info!("Seeding demo data");

    let user = User::create(
        pool,
        CreateUser {
            username: "John Doe".to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            password_hash: hash_password("12345678")?,
            role: None,
        },
    )
    .await?;

    let admin = User::create(
        pool,
        CreateUser {
            username: "Jane Doe".to_string(),
            email: DEMO_ADMIN_EMAIL.to_string(),
            password_hash: hash_password("admin123")?,
            role: Some(Role::Admin),
        },
    )
    .await?;

    let task = Task::create(
        pool,
        CreateTask {
            title: "Task 1".to_string(),
            description: Some("In Progress Task".to_string()),
            status: Some(TaskStatus::InProgress),
            assignee_id: Some(user.id),
        },
    )
    .await?;

    info!(
        user_id = user.id,
        admin_id = admin.id,
        task_id = task.id,
        "Demo data seeded"
    );

    Ok(())
}
