/// User accounts and their store operations
///
/// Passwords never appear here in plaintext; callers hash through
/// `crate::auth::password` first and this module only ever sees the digest.
/// Deleting a user also removes every task assigned to them, in the same
/// statement, through the `ON DELETE CASCADE` foreign key on
/// `tasks.assignee_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{CreateUser, User};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let account = User::create(&pool, CreateUser {
///     username: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: None,
/// }).await?;
///
/// assert!(User::exists_by_email(&pool, &account.email).await?);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Column list shared by every query that reads a full row
const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

/// Role assigned to a user account
///
/// Stored in PostgreSQL as the `user_role` enum type. `Admin` satisfies every
/// requirement that `User` satisfies, plus the admin-only surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary account; the default at registration
    #[default]
    User,

    /// Administrative account with access to the `/api/admin` surface
    Admin,
}

impl Role {
    /// Returns the wire/database representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Whether this role is the administrative role
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Whether this role meets a required role
    ///
    /// Admin is a strict superset of User: an admin satisfies any
    /// requirement, while an ordinary user only satisfies `Role::User`.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Admin => self.is_admin(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored account row
///
/// `password_hash` is an Argon2id digest. Rows must pass through a sanitizing
/// DTO before serialization to a client so the digest never leaves the
/// server.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Database-assigned, immutable
    pub id: i64,

    /// Display name, non-blank
    pub username: String,

    /// Login identity, unique across all accounts
    pub email: String,

    /// Argon2id digest of the password
    pub password_hash: String,

    /// Current role; new accounts start as `Role::User`
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,

    /// Must not collide with an existing account
    pub email: String,

    /// Already-computed Argon2id digest, never the plaintext
    pub password_hash: String,

    /// `None` means `Role::User`
    pub role: Option<Role>,
}

/// Partial update; only the `Some` fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl User {
    /// Inserts an account and returns the stored row
    ///
    /// # Errors
    ///
    /// A duplicate email surfaces as a unique-constraint database error
    /// (`users_email_key`); connection failures pass through unchanged.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(data.username)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.role.unwrap_or_default())
            .fetch_one(pool)
            .await
    }

    /// Looks up an account by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Looks up an account by exact email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether any account uses this email
    pub async fn exists_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Applies a partial update, touching `updated_at`
    ///
    /// Returns the fresh row, or `None` when no account has this id. An
    /// all-`None` update still bumps the timestamp.
    ///
    /// # Errors
    ///
    /// Changing the email to one another account holds surfaces as a
    /// unique-constraint database error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskdeck_shared::models::user::{User, UpdateUser};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let rename = UpdateUser {
    ///     username: Some("Grace".to_string()),
    ///     ..Default::default()
    /// };
    /// let renamed = User::update(&pool, 7, rename).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        // SET clause grows one placeholder per present field; binds below
        // walk the fields in the same order
        let mut sets = String::from("updated_at = NOW()");
        let mut placeholder = 2;
        for (present, column) in [
            (data.username.is_some(), "username"),
            (data.email.is_some(), "email"),
            (data.password_hash.is_some(), "password_hash"),
        ] {
            if present {
                sets.push_str(&format!(", {column} = ${placeholder}"));
                placeholder += 1;
            }
        }

        let sql = format!("UPDATE users SET {sets} WHERE id = $1 RETURNING {USER_COLUMNS}");

        let mut query = sqlx::query_as::<_, User>(&sql).bind(id);
        for value in [data.username, data.email, data.password_hash]
            .into_iter()
            .flatten()
        {
            query = query.bind(value);
        }

        query.fetch_optional(pool).await
    }

    /// Replaces the account's role, touching `updated_at`
    ///
    /// Returns `None` when no account has this id. Tokens already issued keep
    /// the old role until their holder logs in again.
    pub async fn update_role(
        pool: &PgPool,
        id: i64,
        role: Role,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Removes an account by id
    ///
    /// The cascading foreign key drops the account's tasks in the same
    /// statement, so a half-deleted state is never observable. Returns
    /// whether a row was actually removed.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes an account by email
    ///
    /// Self-service deletion path, where the caller is known only by the
    /// email in their token. Cascades exactly like [`User::delete`].
    pub async fn delete_by_email(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All accounts, ordered by id
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");

        sqlx::query_as::<_, User>(&sql).fetch_all(pool).await
    }

    /// Counts all accounts
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}
