use log::info;
use std::sync::Arc;

use crate::auth::{AuthApi, Authenticator, HttpAuthApi, MockAuthApi};
use crate::config::Config;
use crate::error::AppError;
use crate::http;
use crate::routes::Navigator;
use crate::session::SessionStore;
use crate::tasks::{HttpTaskService, MockTaskService, TaskService};

/// Entry point for the UI layer: task operations plus the auth flow, sharing one session.
///
/// Whether the backend or the in-memory mock answers is decided here, once.
pub struct TodoClient {
    tasks: Arc<dyn TaskService>,
    auth: Authenticator,
}

impl TodoClient {
    pub fn new(tasks: Arc<dyn TaskService>, auth: Authenticator) -> Self {
        Self { tasks, auth }
    }

    pub fn from_config(
        config: &Config,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, AppError> {
        let (tasks, api): (Arc<dyn TaskService>, Arc<dyn AuthApi>) = if config.use_mock_api {
            info!("Using mock task and auth services");
            (Arc::new(MockTaskService::new()), Arc::new(MockAuthApi::new()))
        } else {
            info!("Using backend at {}", config.api_base_url);
            let http = http::build_client(config)?;
            (
                Arc::new(HttpTaskService::with_client(
                    http.clone(),
                    config,
                    session.clone(),
                    navigator.clone(),
                )),
                Arc::new(HttpAuthApi::with_client(http, config)),
            )
        };

        Ok(Self::new(tasks, Authenticator::new(api, session, navigator)))
    }

    pub fn tasks(&self) -> &dyn TaskService {
        self.tasks.as_ref()
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }
}
