use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{id_from_string_or_number, optional_id_from_string_or_number};
use crate::utils::{validate_password, EMAIL_REGEX};

/// The signed-in user as cached by the client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Bearer token, only ever held client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl User {
    /// Minimal record used when the backend cannot tell us more about the user.
    pub fn basic(id: impl Into<String>, email: &str, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.to_string(),
            name: name.into(),
            token: None,
        }
    }
}

/// Display name derived from the local part of an email address.
pub fn name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SignInRequest {
    /// Checked with the same pattern as `utils::is_valid_email`.
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Payload for `POST /auth/register`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SignUpRequest {
    /// Checked with the same pattern as `utils::is_valid_email`.
    #[validate(regex(path = "EMAIL_REGEX", message = "Invalid email address"))]
    pub email: String,
    /// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
    #[validate(custom = "validate_password")]
    pub password: String,
    /// Display name for the new account.
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Response to a successful sign-in or sign-up.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthResponse {
    /// The bearer token for subsequent requests.
    pub access_token: String,
    /// Identifier of the authenticated user, when the backend sends one.
    #[serde(
        default,
        deserialize_with = "optional_id_from_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    /// Some backends embed the full user record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl AuthResponse {
    /// The user id from either the flat field or the embedded record.
    pub fn resolved_user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or_else(|| self.user.as_ref().map(|u| u.id.as_str()))
    }
}
