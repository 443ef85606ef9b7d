//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` returned by every client operation.
//! It covers the whole path of a call: configuration, the local session, client-side
//! validation, the HTTP round trip and decoding of the response body.
//!
//! `From` implementations for `reqwest::Error`, `serde_json::Error`,
//! `validator::ValidationErrors` and `std::io::Error` allow easy conversion using the
//! `?` operator.

use reqwest::StatusCode;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the client.
#[derive(Debug)]
pub enum AppError {
    /// The client is misconfigured (missing or invalid base URL, bad config value).
    Configuration(String),
    /// No bearer token or user is available for an operation that needs one.
    Unauthenticated(String),
    /// The requested task does not exist (mock backend).
    NotFound(String),
    /// The backend answered with a non-2xx status.
    Request {
        status: StatusCode,
        status_text: String,
        /// What the client was trying to do, e.g. "fetch tasks".
        context: String,
    },
    /// The request never produced a response (connection refused, timeout, ...).
    Transport(String),
    /// A body or stored session value could not be encoded or decoded.
    Serialization(String),
    /// A request payload failed client-side validation.
    Validation(String),
    /// The persistent session medium could not be read or written.
    Storage(String),
}

impl AppError {
    /// Builds a `Request` error from a response status.
    pub fn request(context: impl Into<String>, status: StatusCode) -> Self {
        AppError::Request {
            status,
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            context: context.into(),
        }
    }

    /// HTTP status carried by a `Request` error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Request {
                status,
                status_text,
                context,
            } => write!(
                f,
                "Failed to {}: {} {}",
                context,
                status.as_u16(),
                status_text
            ),
            AppError::Transport(msg) => write!(f, "Transport Error: {}", msg),
            AppError::Serialization(msg) => write!(f, "Serialization Error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `reqwest::Error` into `AppError`.
///
/// Decode failures become `Serialization`; a status error (from `error_for_status`)
/// keeps its code; everything else is a `Transport` failure.
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> AppError {
        if error.is_decode() {
            AppError::Serialization(error.to_string())
        } else if let Some(status) = error.status() {
            AppError::request("complete request", status)
        } else {
            AppError::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::Serialization(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> AppError {
        AppError::Storage(error.to_string())
    }
}
