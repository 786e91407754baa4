use crate::{
    client::{error_message, ApiError},
    store::Role,
};
use serde_json::Value;
use thiserror::Error;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const SESSION_EXPIRED: &str = "session expired, log in again";

/// Fields checked, in order, when a registration is rejected field by field.
const REGISTRATION_FIELDS: [&str; 3] = ["roll_number", "email", "username"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Authentication(String),
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("{0}")]
    Registration(String),
    #[error("unable to reach the server: {0}")]
    Network(String),
    #[error("this account is a {actual} account, not {expected}")]
    RoleMismatch { expected: Role, actual: Role },
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AuthError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn session_expired() -> Self {
        Self::Authentication(SESSION_EXPIRED.to_string())
    }

    /// Translate a rejected credential exchange.
    pub(crate) fn from_login(err: ApiError) -> Self {
        match err {
            ApiError::Http { status, body, .. } if status.is_client_error() => {
                Self::Authentication(login_message(&body))
            }
            other => Self::from(other),
        }
    }

    /// Translate a rejected registration.
    pub(crate) fn from_registration(err: ApiError) -> Self {
        match err {
            ApiError::Http { status, body, .. } if status.is_client_error() => {
                registration_error(&body)
            }
            other => Self::from(other),
        }
    }

    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(message) => Self::Network(message),
            ApiError::Timeout => Self::Network("request timed out".to_string()),
            ApiError::SessionEnded(_) => Self::session_expired(),
            ApiError::Http { status, .. } if status == reqwest::StatusCode::UNAUTHORIZED => {
                Self::session_expired()
            }
            other => Self::Unexpected(other.to_string()),
        }
    }
}

fn text_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn login_message(body: &Value) -> String {
    text_field(body, "detail")
        .or_else(|| text_field(body, "message"))
        .map_or_else(|| LOGIN_FAILED.to_string(), str::to_string)
}

/// First message reported for a field: `["msg", ..]` or a bare string.
fn field_message(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.first().and_then(field_message),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn registration_error(body: &Value) -> AuthError {
    if let Some(message) = text_field(body, "detail").or_else(|| text_field(body, "message")) {
        return AuthError::Registration(message.to_string());
    }

    for field in REGISTRATION_FIELDS {
        if let Some(message) = body.get(field).and_then(field_message) {
            return AuthError::validation(field, message);
        }
    }

    if let Value::Object(map) = body {
        let other = map
            .iter()
            .filter(|(key, _)| key.as_str() != "error")
            .find_map(|(key, value)| field_message(value).map(|message| (key, message)));
        if let Some((field, message)) = other {
            return AuthError::validation(field, message);
        }
    }

    AuthError::Registration(
        error_message(body).unwrap_or_else(|| REGISTRATION_FAILED.to_string()),
    )
}
