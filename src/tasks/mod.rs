//! Task operations, with one HTTP implementation and one in-memory mock.

pub mod client;
pub mod mock;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, UpdateTaskRequest};

pub use client::HttpTaskService;
pub use mock::MockTaskService;

/// Everything the UI can do with the signed-in user's tasks.
///
/// Implementations are chosen once, when the client is built.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// All tasks of the current user, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;

    async fn get_task(&self, id: &str) -> Result<Task, AppError>;

    /// Creates a pending task.
    async fn create_task(&self, input: CreateTaskRequest) -> Result<Task, AppError>;

    /// Applies a partial update; supplying `status` also updates `completed_at`.
    async fn update_task(&self, id: &str, input: UpdateTaskRequest) -> Result<Task, AppError>;

    async fn delete_task(&self, id: &str) -> Result<(), AppError>;

    /// Flips the task between `Pending` and `Completed`.
    async fn toggle_task(&self, id: &str) -> Result<Task, AppError>;
}
