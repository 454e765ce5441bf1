//! PostgreSQL persistence for lexi.
//!
//! - [`models`] -- row structs and insert DTOs, one module per table.
//! - [`repositories`] -- zero-sized `*Repo` structs with async queries.
//! - [`grading_store`] -- the transactional store behind task grading.

use sqlx::postgres::PgPoolOptions;

pub mod grading_store;
pub mod models;
pub mod repositories;

pub use grading_store::PgGradingStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
