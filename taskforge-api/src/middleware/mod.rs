/// Middleware modules for the API server
///
/// The session guard itself lives in `taskforge_shared::auth::middleware`;
/// this module holds transport-level middleware only.
pub mod security;
