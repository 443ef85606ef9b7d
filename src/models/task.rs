use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{id_from_string_or_number, optional_timestamp, timestamp};

/// Lifecycle state of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task is not done yet.
    Pending,
    /// Task is done; `completed_at` is set.
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

/// A task as returned by the backend (or the mock service).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier, assigned by the backend.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// The title of the task.
    pub title: String,
    /// An optional description for the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The current status of the task.
    pub status: TaskStatus,
    /// Timestamp of when the task was created.
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Present exactly when `status` is `Completed`.
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// Identifier of the user who owns the task.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub user_id: String,
    /// Timestamp of the last update to the task.
    #[serde(
        default,
        deserialize_with = "optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new pending task owned by `user_id`.
    pub fn new(id: String, input: CreateTaskRequest, user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            status: TaskStatus::Pending,
            created_at: now,
            completed_at: None,
            user_id: user_id.to_string(),
            updated_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Sets the status and keeps `completed_at` in step with it.
    ///
    /// A task that is already completed keeps its original completion time.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        match status {
            TaskStatus::Completed => {
                if self.completed_at.is_none() {
                    self.completed_at = Some(now);
                }
            }
            TaskStatus::Pending => self.completed_at = None,
        }
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.set_status(self.status.toggled(), now);
        self.updated_at = Some(now);
    }

    /// Merges a partial update into the task. The id never changes.
    pub fn apply(&mut self, update: UpdateTaskRequest, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.set_status(status, now);
        }
        self.updated_at = Some(now);
    }
}

/// Payload for `POST /api/{userId}/tasks`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateTaskRequest {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial payload for `PATCH /api/{userId}/tasks/{id}`. Absent fields are left untouched.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, Default)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Body of `GET /api/{userId}/tasks`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,
}
