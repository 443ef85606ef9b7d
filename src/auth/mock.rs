use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::AuthApi;
use crate::error::AppError;
use crate::models::user::name_from_email;
use crate::models::{AuthResponse, SignInRequest, SignUpRequest, User};
use crate::tasks::mock::MOCK_USER_ID;

pub const MOCK_TOKEN: &str = "mock-token";

const SIGN_IN_DELAY: Duration = Duration::from_millis(500);
const SIGN_OUT_DELAY: Duration = Duration::from_millis(300);

/// Accepts any credentials and answers for a single mock user.
///
/// `fetch_user` reports whoever signed in last, or the default mock user.
#[derive(Debug, Default)]
pub struct MockAuthApi {
    current: Mutex<Option<User>>,
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_user() -> User {
        User::basic(MOCK_USER_ID, "mock@example.com", "Mock User")
    }

    fn remember(&self, user: &User) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(user.clone());
    }

    fn respond(user: User) -> AuthResponse {
        AuthResponse {
            access_token: MOCK_TOKEN.to_string(),
            user_id: Some(user.id.clone()),
            user: Some(user),
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, AppError> {
        tokio::time::sleep(SIGN_IN_DELAY).await;
        let user = User::basic(MOCK_USER_ID, &request.email, request.name.clone());
        self.remember(&user);
        Ok(Self::respond(user))
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, AppError> {
        tokio::time::sleep(SIGN_IN_DELAY).await;
        let user = User::basic(MOCK_USER_ID, &request.email, name_from_email(&request.email));
        self.remember(&user);
        Ok(Self::respond(user))
    }

    async fn sign_out(&self, _token: &str) -> Result<(), AppError> {
        tokio::time::sleep(SIGN_OUT_DELAY).await;
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    async fn fetch_user(&self, _token: &str) -> Result<User, AppError> {
        Ok(self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_else(Self::default_user))
    }
}
