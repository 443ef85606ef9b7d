//! In-memory stand-in for the task backend, used for offline development.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use log::{debug, warn};
use std::time::Duration;
use tokio::sync::Mutex;
use validator::Validate;

use super::TaskService;
use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest};

/// Owner of every task the mock hands out.
pub const MOCK_USER_ID: &str = "mock-user-id";

const LIST_DELAY: Duration = Duration::from_millis(300);
const GET_DELAY: Duration = Duration::from_millis(200);
const CREATE_DELAY: Duration = Duration::from_millis(400);
const UPDATE_DELAY: Duration = Duration::from_millis(300);
const DELETE_DELAY: Duration = Duration::from_millis(300);
const TOGGLE_DELAY: Duration = Duration::from_millis(250);

struct State {
    tasks: Vec<Task>,
    /// Millisecond stamp of the last generated id; ids never repeat.
    last_id_millis: i64,
}

impl State {
    fn position(&self, id: &str) -> Result<usize, AppError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn next_id(&mut self) -> String {
        let millis = Utc::now().timestamp_millis().max(self.last_id_millis + 1);
        self.last_id_millis = millis;
        format!("task_{}", millis)
    }
}

fn not_found(id: &str) -> AppError {
    warn!("Task with id {} not found", id);
    AppError::NotFound(format!("Task with id {} not found", id))
}

/// Ordered task collection with simulated network latency.
///
/// The lock is only taken after the simulated delay, never across it.
pub struct MockTaskService {
    state: Mutex<State>,
}

impl MockTaskService {
    /// Starts with two sample tasks: one pending, one completed yesterday.
    pub fn new() -> Self {
        let now = Utc::now();
        let tasks = vec![
            Task {
                id: "1".to_string(),
                title: "Sample Task 1".to_string(),
                description: Some("This is a sample task to demonstrate the UI".to_string()),
                status: TaskStatus::Pending,
                created_at: now,
                completed_at: None,
                user_id: MOCK_USER_ID.to_string(),
                updated_at: None,
            },
            Task {
                id: "2".to_string(),
                title: "Sample Task 2".to_string(),
                description: Some("Another sample task".to_string()),
                status: TaskStatus::Completed,
                created_at: now - ChronoDuration::days(1),
                completed_at: Some(now),
                user_id: MOCK_USER_ID.to_string(),
                updated_at: None,
            },
        ];
        Self::with_tasks(tasks)
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            state: Mutex::new(State {
                tasks,
                last_id_millis: 0,
            }),
        }
    }
}

impl Default for MockTaskService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        tokio::time::sleep(LIST_DELAY).await;
        Ok(self.state.lock().await.tasks.clone())
    }

    async fn get_task(&self, id: &str) -> Result<Task, AppError> {
        tokio::time::sleep(GET_DELAY).await;
        let state = self.state.lock().await;
        let idx = state.position(id)?;
        Ok(state.tasks[idx].clone())
    }

    async fn create_task(&self, input: CreateTaskRequest) -> Result<Task, AppError> {
        input.validate()?;
        tokio::time::sleep(CREATE_DELAY).await;

        let mut state = self.state.lock().await;
        let id = state.next_id();
        let task = Task::new(id, input, MOCK_USER_ID, Utc::now());
        debug!("Created mock task {}", task.id);
        state.tasks.insert(0, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &str, input: UpdateTaskRequest) -> Result<Task, AppError> {
        input.validate()?;
        tokio::time::sleep(UPDATE_DELAY).await;

        let mut state = self.state.lock().await;
        let idx = state.position(id)?;
        let task = &mut state.tasks[idx];
        task.apply(input, Utc::now());
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<(), AppError> {
        tokio::time::sleep(DELETE_DELAY).await;

        let mut state = self.state.lock().await;
        let idx = state.position(id)?;
        state.tasks.remove(idx);
        debug!("Deleted mock task {}", id);
        Ok(())
    }

    async fn toggle_task(&self, id: &str) -> Result<Task, AppError> {
        tokio::time::sleep(TOGGLE_DELAY).await;

        let mut state = self.state.lock().await;
        let idx = state.position(id)?;
        let task = &mut state.tasks[idx];
        task.toggle(Utc::now());
        Ok(task.clone())
    }
}
