/// Password hashing built on Argon2id.
///
/// Hashes are stored in PHC string format, so the parameters and salt travel
/// with the hash and verification needs no extra configuration. Verification
/// is constant-time.
///
/// Hashing is deliberately expensive (memory-hard), which makes it the one
/// CPU-bound step in the request path. Handlers must use the `*_blocking`
/// wrappers, which move the work onto Tokio's blocking thread pool instead of
/// stalling the async dispatch path.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("hunter2hunter2")?;
/// assert!(verify_password("hunter2hunter2", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Error type for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash could not be parsed
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),

    /// Blocking-pool task was cancelled or panicked
    #[error("Password task failed: {0}")]
    TaskError(String),
}

/// Hashes a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string (`$argon2id$v=19$...`) to be stored verbatim as the
/// identity's password hash.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC-format hash.
///
/// Returns `Ok(false)` for a wrong password; errors are reserved for
/// malformed hashes and internal failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Hashes a password on the blocking thread pool.
///
/// Argon2id is memory-hard by design; running it inline would block the async
/// executor for tens of milliseconds per call.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::TaskError(e.to_string()))?
}

/// Verifies a password on the blocking thread pool.
pub async fn verify_password_blocking(
    password: String,
    hash: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| PasswordError::TaskError(e.to_string()))?
}

/// Checks a candidate password against the account password policy.
///
/// The policy is a single minimum-length rule; composition rules are left to
/// clients.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("test_password_123").expect("hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
    }

    #[test]
    fn test_hash_password_unique_salts() {
        let hash1 = hash_password("same_password").expect("hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("hash should succeed");

        assert!(verify_password("correct_password", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password").expect("hash should succeed");

        assert!(!verify_password("wrong_password", &hash).expect("verify should succeed"));
        assert!(!verify_password("", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "not-a-phc-string").is_err());
        assert!(verify_password("password", "$argon2id$broken").is_err());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        for password in [
            "simple-enough",
            "with spaces in it",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
        ] {
            let hash = hash_password(password).expect("hash should succeed");
            assert!(
                verify_password(password, &hash).expect("verify should succeed"),
                "password {:?} should verify",
                password
            );
        }
    }

    #[tokio::test]
    async fn test_blocking_wrappers_roundtrip() {
        let hash = hash_password_blocking("off_the_hot_path".to_string())
            .await
            .expect("hash should succeed");

        let ok = verify_password_blocking("off_the_hot_path".to_string(), hash)
            .await
            .expect("verify should succeed");
        assert!(ok);
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("longenough").is_ok());
        assert!(validate_password_strength("secret1").is_ok());
        assert!(validate_password_strength("sixsix").is_ok());

        let err = validate_password_strength("short").unwrap_err();
        assert!(err.contains("at least 6 characters"));
    }
}
