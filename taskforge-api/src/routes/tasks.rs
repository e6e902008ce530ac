/// Task endpoints
///
/// # Endpoints
///
/// - `GET    /v1/tasks` - List with optional search/filter/sort params
/// - `GET    /v1/tasks/stats` - Status counts over the full owner scope
/// - `POST   /v1/tasks` - Create
/// - `PUT    /v1/tasks/:id` - Partial update
/// - `DELETE /v1/tasks/:id` - Hard delete
///
/// Every operation runs inside the session account's scope. The create DTO
/// has no owner field at all, and update/delete match `id AND owner`, so a
/// foreign task id behaves exactly like a nonexistent one.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::middleware::CurrentUser,
    models::task::{
        CreateTask, SortField, SortOrder, TagsInput, Task, TaskPriority, TaskQuery, TaskStats,
        TaskStatus, UpdateTask,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Raw listing parameters as they arrive on the query string.
///
/// Everything is optional and stringly-typed here; [`parse_query`] turns
/// them into a typed [`TaskQuery`] or a validation error. An empty string is
/// treated as absent, matching clients that always send every key.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

fn invalid_param(field: &str, value: &str) -> ApiError {
    ApiError::ValidationError(vec![ValidationErrorDetail {
        field: field.to_string(),
        message: format!("Invalid value: {}", value),
    }])
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Compiles raw query params into a typed [`TaskQuery`].
///
/// Fails with a 400 validation error when an enumerated param is outside its
/// allowed set; unknown values never degrade silently to defaults.
fn parse_query(params: &ListTasksParams) -> ApiResult<TaskQuery> {
    let mut query = TaskQuery::default();

    query.search = non_empty(&params.search).map(|s| s.to_string());

    if let Some(raw) = non_empty(&params.status) {
        query.status = Some(TaskStatus::from_param(raw).ok_or_else(|| invalid_param("status", raw))?);
    }
    if let Some(raw) = non_empty(&params.priority) {
        query.priority =
            Some(TaskPriority::from_param(raw).ok_or_else(|| invalid_param("priority", raw))?);
    }
    if let Some(raw) = non_empty(&params.sort_by) {
        query.sort_by = SortField::from_param(raw).ok_or_else(|| invalid_param("sortBy", raw))?;
    }
    if let Some(raw) = non_empty(&params.order) {
        query.order = SortOrder::from_param(raw).ok_or_else(|| invalid_param("order", raw))?;
    }

    Ok(query)
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    /// Initial status (default: pending)
    pub status: Option<TaskStatus>,

    /// Initial priority (default: medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Tags as a JSON array or one comma-separated string
    pub tags: Option<TagsInput>,
}

/// Update task request
///
/// All fields optional; only supplied fields are applied.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    pub status: Option<TaskStatus>,

    pub priority: Option<TaskPriority>,

    pub due_date: Option<NaiveDate>,

    pub tags: Option<TagsInput>,
}

/// Simple success marker
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Lists the session account's tasks.
///
/// Zero matches returns an empty array, never an error.
///
/// # Errors
///
/// - `400 Bad Request`: enumerated param outside its allowed set
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<ListTasksParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let query = parse_query(&params)?;

    let tasks = Task::list_by_owner(&state.db, user.id, &query).await?;

    Ok(Json(tasks))
}

/// Status counts over the session account's full task set.
///
/// Ignores any filter params; the scope is exactly the one `list` uses with
/// filters cleared, so `total` always matches an unfiltered listing.
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<TaskStats>> {
    let stats = Task::stats_by_owner(&state.db, user.id).await?;

    Ok(Json(stats))
}

/// Creates a task owned by the session account.
///
/// Any owner information a client might try to smuggle in is structurally
/// impossible: the DTO has no such field.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: user.id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or(TaskStatus::Pending),
            priority: req.priority.unwrap_or(TaskPriority::Medium),
            due_date: req.due_date,
            tags: req.tags.map(TagsInput::into_tags).unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, task_id = %task.id, "Task created");

    Ok(Json(task))
}

/// Applies a partial update to one of the session account's tasks.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `404 Not Found`: no such task in this account's scope (whether it does
///   not exist or belongs to someone else)
pub async fn update_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        status: req.status,
        priority: req.priority,
        due_date: req.due_date,
        tags: req.tags.map(TagsInput::into_tags),
    };

    let task = Task::update(&state.db, id, user.id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(user_id = %user.id, task_id = %task.id, "Task updated");

    Ok(Json(task))
}

/// Hard-deletes one of the session account's tasks.
///
/// # Errors
///
/// - `404 Not Found`: no such task in this account's scope
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = Task::delete(&state.db, id, user.id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(user_id = %user.id, task_id = %id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}
