use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use validator::Validate;

use super::TaskService;
use crate::config::Config;
use crate::error::AppError;
use crate::http;
use crate::models::{CreateTaskRequest, Task, TaskListResponse, UpdateTaskRequest};
use crate::routes::{self, Navigator};
use crate::session::SessionStore;

/// Task operations against the backend's `/api/{userId}/tasks` resource.
///
/// Credentials come from the session store on every call. A request without a
/// token or user id fails with `AppError::Unauthenticated` before anything is sent.
/// A 401 answer clears the session and redirects to the sign-in view.
pub struct HttpTaskService {
    http: Client,
    config: Config,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl HttpTaskService {
    pub fn new(
        config: &Config,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        Ok(Self::with_client(
            http::build_client(config)?,
            config,
            session,
            navigator,
        ))
    }

    pub fn with_client(
        http: Client,
        config: &Config,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            config: config.clone(),
            session,
            navigator,
        }
    }

    /// Builds an authorized request for `/api/{userId}/tasks{suffix}`.
    fn request(&self, method: Method, suffix: &str) -> Result<RequestBuilder, AppError> {
        let (token, user_id) = self.session.credentials().map_err(|e| {
            warn!("Refusing task request without a session: {}", e);
            e
        })?;
        let url = self
            .config
            .endpoint(&format!("/api/{}/tasks{}", user_id, suffix));
        debug!("{} {}", method, url);

        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json"))
    }

    /// Sends the request and turns any non-2xx status into `AppError::Request`.
    async fn execute(&self, request: RequestBuilder, context: &str) -> Result<Response, AppError> {
        let response = http::send(request, context).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("Session rejected while trying to {}; signing out", context);
            if let Err(e) = self.session.clear() {
                error!("Failed to clear session after 401: {}", e);
            }
            self.navigator.redirect(routes::SIGNIN);
        }

        let err = AppError::request(context, status);
        error!("{}", err);
        Err(err)
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let context = "fetch tasks";
        let request = self.request(Method::GET, "")?;
        let response = self.execute(request, context).await?;
        let body: TaskListResponse = http::json(response, context).await?;
        Ok(body.tasks)
    }

    async fn get_task(&self, id: &str) -> Result<Task, AppError> {
        let context = "fetch task";
        let request = self.request(Method::GET, &format!("/{}", id))?;
        let response = self.execute(request, context).await?;
        http::json(response, context).await
    }

    async fn create_task(&self, input: CreateTaskRequest) -> Result<Task, AppError> {
        input.validate()?;
        let context = "create task";
        let request = self.request(Method::POST, "")?.json(&input);
        let response = self.execute(request, context).await?;
        http::json(response, context).await
    }

    async fn update_task(&self, id: &str, input: UpdateTaskRequest) -> Result<Task, AppError> {
        input.validate()?;
        let context = "update task";
        let request = self
            .request(Method::PATCH, &format!("/{}", id))?
            .json(&input);
        let response = self.execute(request, context).await?;
        http::json(response, context).await
    }

    async fn delete_task(&self, id: &str) -> Result<(), AppError> {
        let context = "delete task";
        let request = self.request(Method::DELETE, &format!("/{}", id))?;
        self.execute(request, context).await?;
        Ok(())
    }

    async fn toggle_task(&self, id: &str) -> Result<Task, AppError> {
        let context = "toggle task completion";
        let request = self.request(Method::POST, &format!("/{}/complete", id))?;
        let response = self.execute(request, context).await?;
        http::json(response, context).await
    }
}
