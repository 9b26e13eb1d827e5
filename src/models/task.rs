use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the completion status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task has not been completed yet.
    Pending,
    /// Task is done. Reaching this status stamps the task's end time.
    Finished,
}

/// Input structure for creating or fully updating a task.
///
/// All four fields are required; unknown or mistyped fields are rejected at
/// the boundary before any business logic runs.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[validate(schema(function = "validate_time_window"))]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// When work on the task is scheduled to start.
    pub start_time: DateTime<Utc>,

    /// When the task is expected to be finished. Must lie after `start_time`.
    pub end_time: DateTime<Utc>,

    /// The priority of the task, 1 (lowest) through 5 (highest).
    #[validate(range(min = 1, max = 5))]
    pub priority: i32,
}

fn validate_time_window(input: &TaskInput) -> Result<(), ValidationError> {
    if input.end_time <= input.start_time {
        return Err(ValidationError::new("end_time_before_start_time"));
    }
    Ok(())
}

/// Payload for the status-only transition endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    pub status: TaskStatus,
}

/// Represents a task entity as stored in the database and returned by the API.
///
/// On the wire the identifier serializes as `_id` and the remaining fields
/// as camelCase.
#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// The title of the task.
    pub title: String,
    /// When work on the task starts.
    pub start_time: DateTime<Utc>,
    /// When the task is expected to finish; overwritten with the server's
    /// current time when the task transitions to `finished`.
    pub end_time: DateTime<Utc>,
    /// The priority of the task (1-5).
    pub priority: i32,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Identifier of the user who owns the task.
    pub user_id: i32,
}

/// Represents query parameters for filtering tasks when listing them.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Filter tasks by status.
    pub status: Option<TaskStatus>,
    /// Filter tasks by priority.
    pub priority: Option<i32>,
}

impl Task {
    /// Creates a new `Task` from `TaskInput` and the owning `user_id`.
    /// Assigns a fresh UUID and defaults the status to `pending`.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            start_time: input.start_time,
            end_time: input.end_time,
            priority: input.priority,
            status: TaskStatus::Pending,
            user_id,
        }
    }
}
