/// Task model, owner-scoped queries, and the status aggregate
///
/// Every query in this module is scoped by `user_id` before anything else:
/// callers pass the authenticated owner explicitly and there is no unscoped
/// variant to call by mistake. A task another user owns is indistinguishable
/// from a task that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(1000),
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Wire/database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses a client-supplied filter value. `None` means the value is
    /// outside the allowed set, which callers surface as a validation error.
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TaskStatus::Pending),
            "in-progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task priority
///
/// Priority is an ordinal, not a label: sorting uses [`TaskPriority::rank`]
/// so low < medium < high regardless of how the strings compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Wire/database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Ordinal position used for sorting.
    pub fn rank(&self) -> i32 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
        }
    }

    /// Parses a client-supplied filter value.
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Sortable fields for task listings
///
/// Parameter names are the client-facing camelCase spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

impl SortField {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "createdAt" => Some(SortField::CreatedAt),
            "dueDate" => Some(SortField::DueDate),
            "priority" => Some(SortField::Priority),
            "title" => Some(SortField::Title),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Compiled listing parameters.
///
/// The owner scope is *not* part of this struct: it is a separate, mandatory
/// argument to [`Task::list_by_owner`], so no parameter combination can widen
/// the scope.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    /// Case-insensitive substring match over title or description
    pub search: Option<String>,

    /// Exact-match status filter
    pub status: Option<TaskStatus>,

    /// Exact-match priority filter
    pub priority: Option<TaskPriority>,

    /// Sort field
    pub sort_by: SortField,

    /// Sort direction
    pub order: SortOrder,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            priority: None,
            sort_by: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Builds the ORDER BY expression for a listing.
///
/// Priority sorts by ordinal rank, not alphabetically. Every ordering ends
/// with `created_at ASC, id ASC` so that repeated calls with identical
/// parameters and unchanged data return identical row order.
fn order_clause(sort_by: SortField, order: SortOrder) -> String {
    let dir = order.as_sql();
    let key = match sort_by {
        SortField::CreatedAt => "created_at".to_string(),
        SortField::DueDate => "due_date".to_string(),
        SortField::Priority => {
            "CASE priority WHEN 'low' THEN 1 WHEN 'medium' THEN 2 WHEN 'high' THEN 3 END"
                .to_string()
        }
        SortField::Title => "title".to_string(),
    };

    format!("{} {}, created_at ASC, id ASC", key, dir)
}

/// Escapes LIKE metacharacters and wraps the term in wildcards.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Normalizes client-supplied tags.
///
/// Clients send tags either as a JSON array or as one comma-separated string
/// (the web client submits the raw text field). Both normalize the same way:
/// split on commas, trim whitespace, drop empties. An empty string therefore
/// clears the list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl TagsInput {
    pub fn into_tags(self) -> Vec<String> {
        let raw = match self {
            TagsInput::List(items) => items,
            TagsInput::Csv(s) => s.split(',').map(|t| t.to_string()).collect(),
        };

        raw.into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user; set at creation, never transferred
    pub user_id: Uuid,

    /// Short title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date (calendar date, no time component)
    pub due_date: Option<NaiveDate>,

    /// Ordered tag list, possibly empty
    pub tags: Vec<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// `user_id` always comes from the authenticated session, never from the
/// request body.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

/// Input for a partial task update
///
/// Absent fields stay untouched; this is never a full-object overwrite.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

/// Status aggregate over one owner's tasks.
///
/// Computed in a single query, so `total` always equals the sum of the
/// per-status counts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStats {
    pub total: i64,
    pub pending: i64,
    #[serde(rename = "in-progress")]
    pub in_progress: i64,
    pub completed: i64,
}

const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, tags, created_at, updated_at";

impl Task {
    /// Creates a task owned by `data.user_id`.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (user_id, title, description, status, priority, due_date, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.tags)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id within one owner's scope.
    ///
    /// Returns `None` both when the id does not exist and when it belongs to
    /// someone else; callers cannot tell the difference.
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists one owner's tasks with optional filters, search, and ordering.
    ///
    /// The owner predicate is fixed into the statement before any
    /// client-driven predicate is appended. Zero matches is an empty vec,
    /// never an error.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        params: &TaskQuery,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
        let mut bind_count = 1;

        if params.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND status = ${}", bind_count));
        }
        if params.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(" AND priority = ${}", bind_count));
        }
        if params.search.is_some() {
            bind_count += 1;
            query.push_str(&format!(
                " AND (title ILIKE ${n} OR description ILIKE ${n})",
                n = bind_count
            ));
        }

        query.push_str(&format!(
            " ORDER BY {}",
            order_clause(params.sort_by, params.order)
        ));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(owner_id);

        if let Some(status) = params.status {
            q = q.bind(status);
        }
        if let Some(priority) = params.priority {
            q = q.bind(priority);
        }
        if let Some(ref search) = params.search {
            q = q.bind(like_pattern(search));
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Computes the status aggregate over one owner's full task set.
    ///
    /// Same scope as [`Task::list_by_owner`] with filters cleared.
    pub async fn stats_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<TaskStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'completed') AS completed
            FROM tasks
            WHERE user_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(stats)
    }

    /// Applies a partial update to one owner's task.
    ///
    /// Returns `None` if the id does not exist in that owner's scope.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND user_id = $2 RETURNING {}",
            TASK_COLUMNS
        ));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Hard-deletes one owner's task.
    ///
    /// Returns false when nothing matched, for the same two indistinguishable
    /// reasons as [`Task::find_by_id_and_owner`].
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for (s, variant) in [
            ("pending", TaskStatus::Pending),
            ("in-progress", TaskStatus::InProgress),
            ("completed", TaskStatus::Completed),
        ] {
            assert_eq!(TaskStatus::from_param(s), Some(variant));
            assert_eq!(variant.as_str(), s);
        }

        assert_eq!(TaskStatus::from_param("done"), None);
        assert_eq!(TaskStatus::from_param("Pending"), None);
        assert_eq!(TaskStatus::from_param(""), None);
    }

    #[test]
    fn test_status_serde_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );

        let parsed: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn test_priority_rank_is_ordinal() {
        assert!(TaskPriority::Low.rank() < TaskPriority::Medium.rank());
        assert!(TaskPriority::Medium.rank() < TaskPriority::High.rank());

        // Alphabetical order would be high < low < medium; ranks must not
        // follow it.
        let mut by_rank = [TaskPriority::High, TaskPriority::Low, TaskPriority::Medium];
        by_rank.sort_by_key(|p| p.rank());
        assert_eq!(
            by_rank,
            [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High]
        );
    }

    #[test]
    fn test_priority_from_param() {
        assert_eq!(TaskPriority::from_param("high"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::from_param("urgent"), None);
    }

    #[test]
    fn test_sort_field_parses_client_spellings() {
        assert_eq!(
            SortField::from_param("createdAt"),
            Some(SortField::CreatedAt)
        );
        assert_eq!(SortField::from_param("dueDate"), Some(SortField::DueDate));
        assert_eq!(SortField::from_param("priority"), Some(SortField::Priority));
        assert_eq!(SortField::from_param("title"), Some(SortField::Title));

        // snake_case spellings are not part of the contract
        assert_eq!(SortField::from_param("created_at"), None);
        assert_eq!(SortField::from_param("updatedAt"), None);
    }

    #[test]
    fn test_order_clause_priority_uses_rank_case() {
        let clause = order_clause(SortField::Priority, SortOrder::Desc);

        assert!(clause.contains("CASE priority"));
        assert!(clause.contains("WHEN 'low' THEN 1"));
        assert!(clause.contains("WHEN 'high' THEN 3"));
        assert!(clause.ends_with("created_at ASC, id ASC"));
        assert!(clause.contains("DESC"));
    }

    #[test]
    fn test_order_clause_always_has_stable_tiebreak() {
        for field in [
            SortField::CreatedAt,
            SortField::DueDate,
            SortField::Priority,
            SortField::Title,
        ] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let clause = order_clause(field, order);
                assert!(
                    clause.ends_with("created_at ASC, id ASC"),
                    "clause {:?} lacks tie-break",
                    clause
                );
            }
        }
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("report"), "%report%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c\\d"), "%c\\\\d%");
    }

    #[test]
    fn test_tags_from_csv() {
        let tags = TagsInput::Csv("work, urgent".to_string()).into_tags();
        assert_eq!(tags, vec!["work", "urgent"]);
    }

    #[test]
    fn test_tags_empty_string_clears() {
        assert!(TagsInput::Csv(String::new()).into_tags().is_empty());
        assert!(TagsInput::Csv("  , ,".to_string()).into_tags().is_empty());
    }

    #[test]
    fn test_tags_from_list_trims_and_drops_empties() {
        let tags = TagsInput::List(vec![
            " work ".to_string(),
            String::new(),
            "urgent".to_string(),
        ])
        .into_tags();
        assert_eq!(tags, vec!["work", "urgent"]);
    }

    #[test]
    fn test_tags_deserialize_both_shapes() {
        let from_list: TagsInput = serde_json::from_str(r#"["work","urgent"]"#).unwrap();
        assert_eq!(from_list.into_tags(), vec!["work", "urgent"]);

        let from_csv: TagsInput = serde_json::from_str(r#""work, urgent""#).unwrap();
        assert_eq!(from_csv.into_tags(), vec!["work", "urgent"]);
    }

    #[test]
    fn test_default_query_is_created_at_desc() {
        let params = TaskQuery::default();
        assert_eq!(params.sort_by, SortField::CreatedAt);
        assert_eq!(params.order, SortOrder::Desc);
        assert!(params.search.is_none());
        assert!(params.status.is_none());
        assert!(params.priority.is_none());
    }

    #[test]
    fn test_stats_serializes_dashboard_keys() {
        let stats = TaskStats {
            total: 3,
            pending: 1,
            in_progress: 2,
            completed: 0,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["in-progress"], 2);
        assert!(json.get("in_progress").is_none());
    }

    // Database-backed coverage (scoping, ordering against real rows) lives
    // in taskforge-api/tests.
}
