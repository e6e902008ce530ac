/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Create an account and get a token
/// - `POST /v1/auth/login` - Verify credentials and get a token
/// - `GET  /v1/auth/me` - Sanitized view of the session account
///
/// Login deliberately returns the same error for an unknown email and a
/// wrong password, so the response never reveals which check failed.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::{jwt, middleware::CurrentUser, password},
    models::user::{CreateUser, User, UserView},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (minimum length checked against the account policy)
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Response for register and login: the sanitized account plus its token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Sanitized account view (never includes the password hash)
    pub user: UserView,

    /// Bearer token for subsequent requests
    pub token: String,
}

fn issue_token(state: &AppState, user_id: Uuid) -> ApiResult<String> {
    let claims = jwt::Claims::new(user_id, Duration::hours(state.config.jwt.ttl_hours));
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Register a new account
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password_blocking(req.password).await?;

    // Uniqueness is enforced case-insensitively at the store; lowercasing
    // here keeps the stored value canonical.
    let email = req.email.trim().to_lowercase();

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            name: req.name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "Account registered");

    let token = issue_token(&state, user.id)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: invalid credentials (unknown email and wrong
///   password are indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password_blocking(req.password, user.password_hash.clone()).await?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    tracing::info!(user_id = %user.id, "Login succeeded");

    let token = issue_token(&state, user.id)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Returns the session account.
///
/// The session guard has already resolved the token to a live account; this
/// handler only projects it to the sanitized view.
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserView> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            email: "ann@example.com".to_string(),
            password: "secret-enough".to_string(),
            name: "Ann".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret-enough".to_string(),
            name: "Ann".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_name = RegisterRequest {
            email: "ann@example.com".to_string(),
            password: "secret-enough".to_string(),
            name: String::new(),
        };
        assert!(empty_name.validate().is_err());

        let long_name = RegisterRequest {
            email: "ann@example.com".to_string(),
            password: "secret-enough".to_string(),
            name: "a".repeat(51),
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_auth_response_never_leaks_hash() {
        use chrono::Utc;
        use taskforge_shared::models::user::UserRole;

        let user = User {
            id: Uuid::new_v4(),
            email: "ann@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "Ann".to_string(),
            bio: None,
            avatar_url: None,
            role: UserRole::Standard,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let response = AuthResponse {
            user: user.into(),
            token: "jwt".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }
}
