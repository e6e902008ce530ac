/// Common test utilities for integration tests
///
/// Provides a `TestContext` that connects to the database named by
/// `DATABASE_URL`, runs migrations, and builds the full router, plus helpers
/// for driving it with in-process requests. Each test registers accounts
/// with unique emails, so tests do not interfere; `cleanup` removes the
/// accounts a context registered (tasks cascade).
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use taskforge_api::app::{build_router, AppState};
use taskforge_api::config::Config;
use taskforge_shared::db::migrations;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    registered: Vec<Uuid>,
}

impl TestContext {
    /// Creates a test context against the configured database.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        migrations::run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            registered: Vec::new(),
        })
    }

    /// Sends a request and returns the status plus parsed JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers a fresh account and returns (token, user id, email).
    pub async fn register_user(&mut self, name: &str) -> (String, Uuid, String) {
        let email = format!("test-{}@example.com", Uuid::new_v4());

        let (status, body) = self
            .request(
                "POST",
                "/v1/auth/register",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "password": "correct-horse-battery",
                    "name": name,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "register failed: {}", body);

        let token = body["token"].as_str().unwrap().to_string();
        let user_id = Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();
        self.registered.push(user_id);

        (token, user_id, email)
    }

    /// Creates a task through the API and returns its JSON.
    pub async fn create_task(&self, token: &str, body: Value) -> Value {
        let (status, json) = self.request("POST", "/v1/tasks", Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::OK, "create task failed: {}", json);
        json
    }

    /// Removes every account this context registered; tasks cascade.
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for id in &self.registered {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }
}
