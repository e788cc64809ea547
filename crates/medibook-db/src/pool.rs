use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Request-per-call API with short queries; a small fixed pool is enough.
const MAX_CONNECTIONS: u32 = 10;

/// Create the PostgreSQL connection pool shared by all repos.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .context("Failed to connect to Postgres")
}

/// Apply the schema from `medibook-db/migrations` (users with their
/// mailbox columns, doctors, appointments). Safe to run on every startup.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}
