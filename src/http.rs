//! Pieces shared by the HTTP task and auth clients.

use log::error;
use reqwest::{Client, RequestBuilder, Response};

use crate::config::Config;
use crate::error::AppError;

/// Builds the `reqwest` client with the configured request timeout.
pub fn build_client(config: &Config) -> Result<Client, AppError> {
    Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Sends `request`, logging transport failures with `context` ("fetch tasks", ...).
///
/// The response is returned whatever its status; callers decide what non-2xx means.
pub async fn send(request: RequestBuilder, context: &str) -> Result<Response, AppError> {
    request.send().await.map_err(|e| {
        let err = AppError::from(e);
        error!("Error trying to {}: {}", context, err);
        err
    })
}

/// Decodes a JSON body, logging decode failures with `context`.
pub async fn json<T: serde::de::DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, AppError> {
    response.json::<T>().await.map_err(|e| {
        let err = AppError::from(e);
        error!("Error trying to {}: {}", context, err);
        err
    })
}
