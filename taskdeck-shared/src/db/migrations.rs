/// Embedded schema migrations
///
/// Schema changes live as plain SQL files under this crate's `migrations/`
/// directory and are embedded into the binary at compile time, so a deployed
/// server migrates itself at startup without carrying the files around. Each
/// migration is a single `{version}_{name}.sql` applied in version order;
/// sqlx records applied versions in its `_sqlx_migrations` table.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = std::env::var("DATABASE_URL")?;
///
/// ensure_database_exists(&url).await?;
/// let pool = create_pool(DatabaseConfig { url, ..Default::default() }).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies every migration not yet recorded as run
///
/// Already-applied versions are skipped, so calling this on every startup is
/// the intended usage. A failing migration is rolled back where the SQL
/// permits and surfaces as an error.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the connection is
/// lost mid-run.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Applying pending migrations");

    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        warn!("Migration run aborted: {}", e);
        return Err(e);
    }

    info!("Schema is up to date");
    Ok(())
}

/// Creates the database named in the URL if it is missing
///
/// Convenience for development and test environments; production databases
/// are expected to exist already.
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or the role may
/// not create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Target database already present");
        return Ok(());
    }

    info!("Target database missing, creating it");
    Postgres::create_database(database_url).await?;
    info!("Database created");

    Ok(())
}
