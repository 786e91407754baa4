use super::ApiError;
use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Everything needed to send (and replay) one backend call.
///
/// The `retried` marker is set before a request is replayed after a token
/// refresh. A request carrying the marker is never refreshed again, which caps
/// recovery at one replay per authentication failure.
#[derive(Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
    pub(crate) bearer: Option<SecretString>,
    retried: bool,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            params: Vec::new(),
            body: None,
            bearer: None,
            retried: false,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    /// # Errors
    /// Returns `ApiError::Serialization` if the body cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|err| ApiError::Serialization(err.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present.
    #[must_use]
    pub fn param_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Pre-set the retry marker so an authentication failure is returned as-is
    /// instead of triggering a refresh. Used for credential exchanges.
    #[must_use]
    pub fn without_refresh(mut self) -> Self {
        self.retried = true;
        self
    }

    pub(crate) fn mark_retried(&mut self) {
        self.retried = true;
    }

    #[must_use]
    pub fn is_retried(&self) -> bool {
        self.retried
    }

    #[must_use]
    pub fn has_bearer(&self) -> bool {
        self.bearer.is_some()
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &self.params)
            .field("bearer", &self.bearer.as_ref().map(|_| "***"))
            .field("retried", &self.retried)
            .finish_non_exhaustive()
    }
}
