/// Database models for Taskforge
///
/// # Models
///
/// - `user`: accounts and credential storage
/// - `task`: task records, owner-scoped queries, and the status aggregate
pub mod task;
pub mod user;
