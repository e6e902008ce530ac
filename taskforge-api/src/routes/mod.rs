/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration, login, session introspection
/// - `users`: profile and password management
/// - `tasks`: task CRUD, listing, and status aggregate
pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
