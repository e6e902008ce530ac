/// Bearer token issuance and verification.
///
/// Sessions are stateless: a signed HS256 JWT binds a single user id to a
/// time window, and no session table exists server-side. Logout is a
/// client-side discard; a password change does not invalidate outstanding
/// tokens (they age out naturally).
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC-SHA256), secret must be at least 32 bytes
/// - **Expiration**: fixed time-to-live from configuration, default 72 hours
/// - **Validation**: signature, expiry, not-before, and issuer checks
///
/// Verification is pure computation with no I/O; it is always safe to run
/// inline. Resolving the embedded id to a live account is the session
/// guard's job, not this module's.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::jwt::{create_token, validate_token, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-key-of-at-least-32-bytes!!";
///
/// let claims = Claims::new(user_id, Duration::hours(72));
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in every token and required at validation.
const ISSUER: &str = "taskforge";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature mismatch, malformed structure, or bad issuer
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Claims carried by a session token.
///
/// `sub` is the only custom binding: exactly one user id per token. The rest
/// are the standard time-window claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskforge"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for a user with the given time-to-live.
    ///
    /// The TTL comes from configuration (`JWT_TTL_HOURS`); it is never a
    /// per-call decision.
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + ttl;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the token window has closed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact JWT string.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Validates a token and extracts its claims.
///
/// Rejects on signature mismatch, malformed structure, wrong issuer, expiry,
/// or use before `nbf`. On success returns the claims; the caller resolves
/// `sub` to a live account.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(token_data.claims)
}
