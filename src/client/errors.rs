use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Maximum number of error body characters surfaced to users.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request URL: {0}")]
    Url(String),
    #[error("unable to reach the server: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("request failed ({status}): {message}")]
    Http {
        status: StatusCode,
        message: String,
        body: Value,
    },
    #[error("session ended: {0}")]
    SessionEnded(Box<ApiError>),
    #[error("failed to encode request: {0}")]
    Serialization(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an HTTP error from a non-success response body.
    #[must_use]
    pub fn http(status: StatusCode, body: Value) -> Self {
        let message = error_message(&body).unwrap_or_else(|| default_message(status));
        Self::Http {
            status,
            message,
            body,
        }
    }

    /// Status code of the underlying HTTP failure, looking through a session teardown.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::SessionEnded(inner) => inner.status(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub fn is_session_ended(&self) -> bool {
        matches!(self, Self::SessionEnded(_))
    }

    /// Response body of the underlying HTTP failure, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } => Some(body),
            Self::SessionEnded(inner) => inner.body(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_builder() {
            Self::Url(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Pull a human readable message out of a backend error payload.
///
/// The backend reports errors as `{"detail": ..}`, `{"message": ..}` or
/// `{"error": ..}`; plain-text bodies are used as-is.
#[must_use]
pub fn error_message(body: &Value) -> Option<String> {
    let text = match body {
        Value::String(text) => Some(text.as_str()),
        Value::Object(map) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }?;

    let sanitized = sanitize(text);
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| "Request failed.".to_string(), str::to_string)
}

/// Trim and truncate text shown to users.
fn sanitize(text: &str) -> String {
    text.trim().chars().take(MAX_ERROR_CHARS).collect()
}
