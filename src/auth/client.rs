use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};

use super::AuthApi;
use crate::config::Config;
use crate::error::AppError;
use crate::http;
use crate::models::{AuthResponse, SignInRequest, SignUpRequest, User};

/// `AuthApi` over HTTP.
pub struct HttpAuthApi {
    http: Client,
    config: Config,
}

impl HttpAuthApi {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self::with_client(http::build_client(config)?, config))
    }

    pub fn with_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            config: config.clone(),
        }
    }

    fn ensure_success(response: Response, context: &str) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let err = AppError::request(context, status);
            error!("{}", err);
            Err(err)
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<AuthResponse, AppError> {
        let context = "sign up";
        debug!("POST /auth/register for {}", request.email);
        let response = http::send(
            self.http
                .post(self.config.endpoint("/auth/register"))
                .header(CONTENT_TYPE, "application/json")
                .json(request),
            context,
        )
        .await?;
        http::json(Self::ensure_success(response, context)?, context).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<AuthResponse, AppError> {
        let context = "sign in";
        debug!("POST /auth/login for {}", request.email);
        let response = http::send(
            self.http
                .post(self.config.endpoint("/auth/login"))
                .header(CONTENT_TYPE, "application/json")
                .json(request),
            context,
        )
        .await?;
        http::json(Self::ensure_success(response, context)?, context).await
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        let context = "sign out";
        let response = http::send(
            self.http
                .post(self.config.endpoint("/auth/logout"))
                .bearer_auth(token)
                .header(CONTENT_TYPE, "application/json"),
            context,
        )
        .await?;
        // The acknowledgement body carries nothing we need
        Self::ensure_success(response, context)?;
        Ok(())
    }

    async fn fetch_user(&self, token: &str) -> Result<User, AppError> {
        let context = "get user info";
        let response = http::send(
            self.http
                .get(self.config.endpoint("/auth/me"))
                .bearer_auth(token)
                .header(CONTENT_TYPE, "application/json"),
            context,
        )
        .await?;
        http::json(Self::ensure_success(response, context)?, context).await
    }
}
