/// Integration tests for the database connection pool
///
/// Tests that need a live PostgreSQL are `#[ignore]`d; run them with:
///
/// ```bash
/// DATABASE_URL="postgresql://localhost:5432/taskforge_test" \
/// cargo test -p taskforge-shared --test db_pool_tests -- --ignored
/// ```
use std::env;
use std::time::Duration;
use taskforge_shared::db::pool::{health_check, DatabaseConfig};

fn get_test_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost:5432/taskforge_test".to_string())
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set DATABASE_URL)"]
async fn test_connect_and_health_check() {
    let pool = DatabaseConfig::new(get_test_database_url())
        .max_connections(5)
        .connect()
        .await
        .expect("pool should connect");

    health_check(&pool).await.expect("health check should pass");
}

#[tokio::test]
async fn test_connect_with_unreachable_host_fails() {
    let mut config = DatabaseConfig::new("postgresql://invalid@nonexistent.invalid:5432/invalid");
    config.acquire_timeout = Duration::from_secs(2);

    assert!(config.connect().await.is_err());
}
