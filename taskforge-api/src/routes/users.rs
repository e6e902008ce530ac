/// Profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/users/profile` - Sanitized view of the session account
/// - `PUT /v1/users/profile` - Partial profile update (name, bio, avatar)
/// - `PUT /v1/users/password` - Password change, gated on the current password
///
/// Profile updates are partial: a field absent from the request stays
/// untouched, an empty string clears a clearable field. Email is immutable
/// and has no update path.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::{middleware::CurrentUser, password},
    models::user::{UpdateUser, User, UserView},
};
use validator::Validate;

/// Update profile request
///
/// All fields optional; only supplied fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    /// New bio; empty string clears it
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,

    /// New avatar URL; empty string clears it
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar: Option<String>,
}

/// Update password request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    /// Current password, re-verified before any change
    pub current_password: String,

    /// Replacement password
    pub new_password: String,
}

/// Simple success marker
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Returns the session account's profile.
pub async fn get_profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserView> {
    Json(user.into())
}

/// Applies a partial profile update.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(mut req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserView>> {
    // An empty string means "clear this field"; pull those out before
    // validation so the URL check only sees real values.
    let clear_bio = req.bio.as_deref() == Some("");
    if clear_bio {
        req.bio = None;
    }
    let clear_avatar = req.avatar.as_deref() == Some("");
    if clear_avatar {
        req.avatar = None;
    }

    req.validate()?;

    let update = UpdateUser {
        name: req.name,
        bio: if clear_bio { Some(None) } else { req.bio.map(Some) },
        avatar_url: if clear_avatar {
            Some(None)
        } else {
            req.avatar.map(Some)
        },
        password_hash: None,
    };

    let updated = User::update(&state.db, user.id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    tracing::info!(user_id = %updated.id, "Profile updated");

    Ok(Json(updated.into()))
}

/// Changes the session account's password.
///
/// The new hash fully replaces the old one. Outstanding tokens are not
/// invalidated; they age out at their natural expiry.
///
/// # Errors
///
/// - `400 Bad Request`: new password fails the account policy
/// - `401 Unauthorized`: current password is wrong
pub async fn update_password(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    password::validate_password_strength(&req.new_password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "newPassword".to_string(),
            message: e,
        }])
    })?;

    let valid =
        password::verify_password_blocking(req.current_password, user.password_hash.clone())
            .await?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let password_hash = password::hash_password_blocking(req.new_password).await?;

    User::update(
        &state.db,
        user.id,
        UpdateUser {
            password_hash: Some(password_hash),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    tracing::info!(user_id = %user.id, "Password changed");

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_request_validation() {
        let valid = UpdateProfileRequest {
            name: Some("Ann".to_string()),
            bio: None,
            avatar: Some("https://example.com/a.png".to_string()),
        };
        assert!(valid.validate().is_ok());

        let long_bio = UpdateProfileRequest {
            name: None,
            bio: Some("b".repeat(501)),
            avatar: None,
        };
        assert!(long_bio.validate().is_err());

        let bad_avatar = UpdateProfileRequest {
            name: None,
            bio: None,
            avatar: Some("not a url".to_string()),
        };
        assert!(bad_avatar.validate().is_err());
    }

    #[test]
    fn test_update_password_request_uses_camel_case() {
        let req: UpdatePasswordRequest = serde_json::from_str(
            r#"{"currentPassword": "old-secret", "newPassword": "new-secret"}"#,
        )
        .unwrap();

        assert_eq!(req.current_password, "old-secret");
        assert_eq!(req.new_password, "new-secret");
    }
}
