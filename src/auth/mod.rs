pub mod client;
pub mod flow;
pub mod mock;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{AuthResponse, SignInRequest, SignUpRequest, User};

// Re-export necessary items
pub use client::HttpAuthApi;
pub use flow::Authenticator;
pub use mock::MockAuthApi;

/// The backend's authentication endpoints.
///
/// Implementations are stateless with respect to the session: tokens are passed
/// in explicitly and nothing is persisted here. Session bookkeeping lives in
/// `Authenticator`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/register`
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, AppError>;

    /// `POST /auth/login`
    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, AppError>;

    /// `POST /auth/logout` with the given bearer token.
    async fn sign_out(&self, token: &str) -> Result<(), AppError>;

    /// `GET /auth/me` with the given bearer token.
    async fn fetch_user(&self, token: &str) -> Result<User, AppError>;
}
