/// Authentication primitives for Taskforge
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: stateless bearer token issuance and validation
/// - [`middleware`]: the session guard every protected route passes through
///
/// The division of labor: `jwt` proves a token was issued by us and is still
/// inside its time window (pure computation), `middleware` turns that proof
/// into a live account attached to the request, and `password` covers the
/// credential check at login and password change.
pub mod jwt;
pub mod middleware;
pub mod password;
