/// Session guard middleware for Axum
///
/// Every protected route passes through exactly one gate: extract the bearer
/// value, validate the token, resolve the embedded id to a *live* account,
/// and attach that account to the request. Handlers downstream read identity
/// only from the [`CurrentUser`] extension — never from a client-supplied
/// field — so all task and profile operations are scoped to the
/// authenticated account by construction.
///
/// Missing, malformed, expired, and orphaned tokens all fail with the same
/// 401 class; the guard never reveals which check rejected the request
/// beyond its message.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Extension, Router};
/// use sqlx::PgPool;
/// use taskforge_shared::auth::middleware::{session_guard_layer, CurrentUser};
///
/// async fn whoami(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     user.email
/// }
///
/// fn protected(pool: PgPool) -> Router {
///     Router::new()
///         .route("/me", get(whoami))
///         .layer(axum::middleware::from_fn(session_guard_layer(pool, "jwt-secret")))
/// }
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;

use super::jwt::{validate_token, JwtError};
use crate::models::user::User;

/// The authenticated account, attached to request extensions by the guard.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Error type for the session guard
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header on a protected route
    MissingCredentials,

    /// Header present but not a Bearer value
    InvalidFormat,

    /// Token failed signature, structure, or expiry checks
    InvalidToken(String),

    /// Token verified but the account no longer exists
    UnknownIdentity,

    /// The user store was unreachable
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // All rejection paths share the 401 class so a caller cannot probe
        // which check failed.
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials".to_string())
            }
            AuthError::InvalidFormat => {
                (StatusCode::UNAUTHORIZED, "Expected Bearer token".to_string())
            }
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg),
            AuthError::UnknownIdentity => {
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string())
            }
            AuthError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "Session guard store lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": if status == StatusCode::UNAUTHORIZED { "unauthorized" } else { "internal_error" },
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Session guard middleware.
///
/// 1. Extract `Authorization: Bearer <token>`
/// 2. Validate the token signature and time window
/// 3. Resolve the subject to a live account
/// 4. Insert [`CurrentUser`] into request extensions
pub async fn session_guard(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    // A valid signature is not enough: the account must still exist.
    let user = User::find_by_id(&pool, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::UnknownIdentity)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Creates a session guard closure for `axum::middleware::from_fn`.
///
/// Captures the pool and JWT secret so routers can layer the guard without
/// threading state through every call site.
pub fn session_guard_layer(
    pool: PgPool,
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let pool = pool.clone();
        let secret = secret.clone();
        Box::pin(session_guard(pool, secret, req, next))
    }
}
