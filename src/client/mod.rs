//! HTTP client core. Every backend call goes through [`ApiClient::execute`], which
//! runs three stages in a fixed order:
//!
//! 1. [`attach`]: copy the stored access token into the request as a bearer
//!    credential. A missing token is not an error; the request goes out
//!    unauthenticated.
//! 2. [`ApiClient::send`]: one HTTP round trip, no retries.
//! 3. [`ApiClient::recover`]: on `401`, refresh the access token once and replay
//!    the request once. If the refresh is impossible or rejected the stored
//!    session is cleared and the caller receives [`ApiError::SessionEnded`].
//!
//! Feature code never handles tokens; it builds a [`RequestDescriptor`] and
//! interprets the result.

mod errors;
mod request;

pub use errors::{error_message, ApiError};
pub use request::RequestDescriptor;

use crate::{store::TokenStore, APP_USER_AGENT};
use reqwest::{header::ACCEPT, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Token refresh endpoint.
pub const REFRESH_PATH: &str = "/api/token/refresh/";
/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Notified when the client tears down the stored session after a failed refresh.
pub trait SessionListener: Send + Sync {
    fn session_ended(&self);
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Response wrapper: status plus decoded body.
///
/// Empty bodies decode to `null`; bodies that are not JSON are kept as a JSON string.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    /// Decode the body into `T`.
    /// # Errors
    /// Returns `ApiError::Decode` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Turn a non-success response into `ApiError::Http`.
    /// # Errors
    /// Returns `ApiError::Http` for any non-2xx status.
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(self.into_error())
        }
    }

    #[must_use]
    pub fn into_error(self) -> ApiError {
        ApiError::http(self.status, self.body)
    }
}

/// Request augmentation stage: set the bearer credential from the store.
#[must_use]
pub fn attach(store: &dyn TokenStore, mut request: RequestDescriptor) -> RequestDescriptor {
    request.bearer = store
        .get()
        .map(|session| session.access_token)
        .filter(|token| !token.expose_secret().is_empty());
    request
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    store: Arc<dyn TokenStore>,
    listener: Option<Arc<dyn SessionListener>>,
}

impl ApiClient {
    /// Build a client for the backend at `base_url`.
    /// # Errors
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(
        base_url: &Url,
        timeout: Duration,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ApiError::Url(format!(
                    "unsupported scheme {scheme}, expected http or https"
                )))
            }
        }

        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url.as_str().trim_end_matches('/')),
            store,
            listener: None,
        })
    }

    /// Register the component that publishes session teardown to consumers.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the configured base URL and an endpoint path.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        let path = path.trim();
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    /// Run a request through attach, send and recover.
    /// # Errors
    /// Returns `ApiError::Http` for non-success responses, `ApiError::SessionEnded`
    /// when the session had to be torn down, or a transport error.
    pub async fn execute(&self, request: RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let request = attach(self.store.as_ref(), request);
        let response = self.send(&request).await?;
        self.recover(request, response).await
    }

    /// Execute and decode the body as `T`.
    /// # Errors
    /// Same as [`ApiClient::execute`], plus `ApiError::Decode`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestDescriptor,
    ) -> Result<T, ApiError> {
        self.execute(request).await?.json()
    }

    /// One HTTP round trip with exactly the credentials the descriptor carries.
    /// # Errors
    /// Returns `ApiError::Network` or `ApiError::Timeout` if the backend cannot be reached.
    pub async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint_url(&request.path);
        let request_id = Uuid::new_v4();

        debug!(
            method = %request.method,
            url = %url,
            request_id = %request_id,
            authenticated = request.has_bearer(),
            retried = request.is_retried(),
            "sending request"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(ACCEPT, "application/json")
            .header("X-Request-Id", request_id.to_string());

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(status = %status, url = %url, request_id = %request_id, "response received");

        Ok(ApiResponse {
            url,
            status,
            body: parse_body(&text),
        })
    }

    /// Response recovery stage.
    /// # Errors
    /// See [`ApiClient::execute`].
    pub async fn recover(
        &self,
        mut request: RequestDescriptor,
        response: ApiResponse,
    ) -> Result<ApiResponse, ApiError> {
        if response.status.is_success() {
            return Ok(response);
        }

        if response.status != StatusCode::UNAUTHORIZED || request.is_retried() {
            return Err(response.into_error());
        }

        request.mark_retried();
        let original = response.into_error();

        let Some(session) = self
            .store
            .get()
            .filter(|session| !session.refresh_token.expose_secret().is_empty())
        else {
            warn!(path = %request.path, "authentication failed and no refresh token is stored");
            return Err(self.end_session(original));
        };

        let access_token = match self.refresh_access_token(&session.refresh_token).await {
            Ok(token) => token,
            Err(err) => {
                warn!(path = %request.path, "token refresh failed: {err}");
                return Err(self.end_session(original));
            }
        };

        self.store
            .set(access_token.clone(), session.refresh_token, session.user);
        info!(path = %request.path, "access token refreshed, replaying request");

        request.bearer = Some(access_token);
        self.send(&request).await?.into_result()
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The call is sent directly and never passes through [`ApiClient::recover`].
    /// # Errors
    /// Returns the backend rejection, a transport error, or `ApiError::Decode`
    /// when the response carries no access token.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<SecretString, ApiError> {
        let request = RequestDescriptor::post(REFRESH_PATH)
            .json(&RefreshRequest {
                refresh: refresh_token.expose_secret(),
            })?
            .without_refresh();

        let payload: RefreshResponse = self.send(&request).await?.into_result()?.json()?;
        if payload.access.is_empty() {
            return Err(ApiError::Decode("refresh response has an empty access token".into()));
        }

        Ok(SecretString::from(payload.access))
    }

    fn end_session(&self, original: ApiError) -> ApiError {
        self.store.clear();
        if let Some(listener) = &self.listener {
            listener.session_ended();
        }
        info!("session ended, login required");
        ApiError::SessionEnded(Box::new(original))
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("user_agent", &APP_USER_AGENT)
            .finish_non_exhaustive()
    }
}

fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
