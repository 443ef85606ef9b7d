use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Request timeout used when `API_TIMEOUT_MS` is not set.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SESSION_FILE: &str = ".todo-session.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL without a trailing slash.
    pub api_base_url: String,
    /// Use the in-memory mock services instead of the backend.
    pub use_mock_api: bool,
    pub timeout: Duration,
    /// Where the CLI persists its session between runs.
    pub session_file: PathBuf,
}

impl Config {
    pub fn new(api_base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            api_base_url: normalize_base_url(api_base_url)?,
            use_mock_api: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = env::var("API_BASE_URL").map_err(|_| {
            AppError::Configuration("API_BASE_URL environment variable is required".into())
        })?;

        let timeout_ms = match env::var("API_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Configuration(format!("API_TIMEOUT_MS must be a number, got {:?}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            api_base_url: normalize_base_url(&api_base_url)?,
            use_mock_api: env::var("USE_MOCK_API").map(|v| v == "true").unwrap_or(false),
            timeout: Duration::from_millis(timeout_ms),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE)),
        })
    }

    pub fn with_mock_api(mut self, use_mock_api: bool) -> Self {
        self.use_mock_api = use_mock_api;
        self
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Configuration("API base URL is not configured".into()));
    }

    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| AppError::Configuration(format!("Invalid API base URL {:?}: {}", trimmed, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AppError::Configuration(format!(
            "Invalid API base URL {:?}: scheme must be http or https",
            trimmed
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
