#![doc = "The `todo_client` library crate."]
#![doc = ""]
#![doc = "Client-side data access for the Todo API: the authentication flow and session"]
#![doc = "store, task CRUD against the backend or an in-memory mock, and the small"]
#![doc = "formatting and validation helpers the UI layer needs."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod routes;
pub mod session;
pub mod tasks;
pub mod utils;

pub use crate::client::TodoClient;
pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::models::{CreateTaskRequest, Task, TaskStatus, UpdateTaskRequest, User};
pub use crate::session::SessionStore;
pub use crate::tasks::TaskService;
