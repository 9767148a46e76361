//! PostgreSQL connection pool and schema setup for the article store.
//!
//! Only used when `DATABASE_URL` is a Postgres connection string; the
//! in-process store needs neither a pool nor migrations. Startup calls
//! [`create_pool`] then [`run_migrations`] before handing the pool to
//! `PgArticleStore`.

use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

/// Type alias for the PostgreSQL connection pool shared by `PgArticleStore`.
pub type DbPool = Pool<Postgres>;

/// Upper bound on open connections.
///
/// Each article request issues exactly one statement, so a small pool is
/// enough for the request-parallel load this service sees.
const MAX_CONNECTIONS: u32 = 5;

/// Create a new PostgreSQL connection pool.
///
/// One connection is opened eagerly so a bad `DATABASE_URL` or an
/// unreachable server fails startup instead of the first request. Further
/// connections are opened on demand up to [`MAX_CONNECTIONS`] and reused
/// across requests.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string, e.g. `postgres://localhost:5432/blog`
///
/// # Errors
///
/// Returns an error if:
/// - The connection string cannot be parsed
/// - The server cannot be reached
/// - Authentication fails
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Bring the `articles` schema up to date.
///
/// Migration files live in `migrations/` and are embedded into the binary at
/// compile time. Applied versions are recorded in `_sqlx_migrations`, so a
/// restart against an existing database only runs what is new.
///
/// # Migration Files
///
/// - `20250101000001_create_articles.sql`: the `articles` table, the CHECK
///   constraints rejecting empty `title`/`content`, and the `created_at DESC`
///   index used by listing
///
/// # Errors
///
/// Returns an error if a migration fails to apply or an already-applied
/// migration was edited after the fact.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
