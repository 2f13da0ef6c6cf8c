/// Getting to a usable database
///
/// Startup runs through here in order: [`migrations::ensure_database_exists`]
/// creates the database when absent, [`pool::create_pool`] opens and
/// health-checks the connection pool, [`migrations::run_migrations`] applies
/// the embedded schema, and [`seed`] optionally loads demo fixtures. Queries
/// themselves live with the models.

pub mod migrations;
pub mod pool;
pub mod seed;
