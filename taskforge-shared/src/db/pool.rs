/// Database connection pool management
///
/// The pool is the only shared mutable state in the system; all
/// synchronization between concurrent requests happens at the store, not in
/// the core. Construction fails fast: an unreachable database is a startup
/// error, not a first-request surprise.
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::db::pool::DatabaseConfig;
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = DatabaseConfig::new(std::env::var("DATABASE_URL").unwrap())
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to keep warm
    pub min_connections: u32,

    /// How long to wait for a free connection
    pub acquire_timeout: Duration,

    /// Idle time after which a connection is closed, if any
    pub idle_timeout: Option<Duration>,
}

impl DatabaseConfig {
    /// Settings with sensible defaults for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
        }
    }

    /// Overrides the pool size.
    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    /// Opens the pool and verifies connectivity with a health check.
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        info!(
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            "Creating database connection pool"
        );

        let mut options = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout);

        if let Some(idle) = self.idle_timeout {
            options = options.idle_timeout(idle);
        }

        let pool = options.connect(&self.url).await?;
        health_check(&pool).await?;

        info!("Database connection pool created successfully");
        Ok(pool)
    }
}

/// Runs a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let (probe,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;
    if probe != 1 {
        return Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ));
    }

    Ok(())
}
