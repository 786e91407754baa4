//! Authentication session manager. Owns the credential exchanges (login,
//! registration, logout, explicit refresh) and publishes an [`AuthState`] that
//! views observe. Token material only ever lands in the [`TokenStore`] owned by
//! the client; this module reads it per operation.

mod errors;
pub mod guard;
mod state;
mod types;

pub use errors::AuthError;
pub use state::{AuthState, StatePublisher};
pub use types::Registration;

use crate::{
    client::{ApiClient, RequestDescriptor},
    store::{Role, Session, TokenStore, User},
};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument, warn};
use types::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

pub const LOGIN_PATH: &str = "/api/token/";
pub const REGISTER_PATH: &str = "/api/users/register/";
pub const LOGOUT_PATH: &str = "/api/users/logout/";

const REGISTERED: &str = "Registration submitted, awaiting administrator approval";

#[derive(Clone)]
pub struct SessionManager {
    client: ApiClient,
    state: StatePublisher,
}

impl SessionManager {
    /// Wrap `client`, registering the state publisher for session teardown.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        let state = StatePublisher::new();
        let client = client.with_listener(Arc::new(state.clone()));
        Self { client, state }
    }

    /// Client with the session listener attached; feature code should use this one.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn store(&self) -> &Arc<dyn TokenStore> {
        self.client.store()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.current()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Hydrate the published state from the token store.
    pub fn initialize(&self) -> AuthState {
        let user = self
            .store()
            .get()
            .filter(|_| self.store().is_authenticated())
            .map(|session| session.user);
        self.state.hydrated(user);
        self.state.current()
    }

    /// Exchange credentials for a session.
    /// # Errors
    /// Returns `AuthError::Authentication` with the backend message when the
    /// credentials are rejected; the prior session is left untouched.
    pub async fn login(
        &self,
        identifier: &str,
        secret: &SecretString,
    ) -> Result<Session, AuthError> {
        self.authenticate(identifier, secret, None).await
    }

    /// Role-specific login entry point.
    /// # Errors
    /// As [`SessionManager::login`], plus `AuthError::RoleMismatch` when the
    /// account holds a different role. Nothing is stored in that case.
    pub async fn login_as(
        &self,
        identifier: &str,
        secret: &SecretString,
        role: Role,
    ) -> Result<Session, AuthError> {
        self.authenticate(identifier, secret, Some(role)).await
    }

    async fn authenticate(
        &self,
        identifier: &str,
        secret: &SecretString,
        expected: Option<Role>,
    ) -> Result<Session, AuthError> {
        self.state.begin();
        match self.exchange_credentials(identifier, secret, expected).await {
            Ok(session) => {
                self.state.signed_in(session.user.clone());
                Ok(session)
            }
            Err(err) => {
                self.state.finished(Some(err.to_string()));
                Err(err)
            }
        }
    }

    #[instrument(skip(self, secret))]
    async fn exchange_credentials(
        &self,
        identifier: &str,
        secret: &SecretString,
        expected: Option<Role>,
    ) -> Result<Session, AuthError> {
        let request = RequestDescriptor::post(LOGIN_PATH)
            .json(&LoginRequest {
                username: identifier.trim(),
                password: secret.expose_secret(),
            })?
            .without_refresh();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(AuthError::from_login)?;
        let tokens: TokenResponse = response.json()?;

        if let Some(expected) = expected {
            if tokens.user.role != expected {
                warn!(
                    username = %tokens.user.username,
                    expected = %expected,
                    actual = %tokens.user.role,
                    "login rejected for role"
                );
                return Err(AuthError::RoleMismatch {
                    expected,
                    actual: tokens.user.role,
                });
            }
        }

        if tokens.access.is_empty() || tokens.refresh.is_empty() {
            return Err(AuthError::Unexpected(
                "login response is missing tokens".to_string(),
            ));
        }

        let session = Session {
            access_token: SecretString::from(tokens.access),
            refresh_token: SecretString::from(tokens.refresh),
            user: tokens.user,
        };
        self.store().set(
            session.access_token.clone(),
            session.refresh_token.clone(),
            session.user.clone(),
        );
        info!(username = %session.user.username, role = %session.user.role, "session established");

        Ok(session)
    }

    /// Submit a self-registration. Never establishes a session.
    /// # Errors
    /// Returns `AuthError::Validation` for field-level problems (checked locally
    /// first, then as reported by the backend) or `AuthError::Registration`.
    #[instrument(skip_all, fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<String, AuthError> {
        self.state.begin();
        let result = self.submit_registration(registration).await;
        self.state
            .finished(result.as_ref().err().map(ToString::to_string));
        result
    }

    async fn submit_registration(&self, registration: &Registration) -> Result<String, AuthError> {
        validate_registration(registration)?;

        let request = RequestDescriptor::post(REGISTER_PATH)
            .json(&RegisterRequest {
                username: registration.username.trim(),
                email: registration.email.trim(),
                password: registration.password.expose_secret(),
                full_name: registration.full_name.trim(),
                department: registration.department.trim(),
                roll_number: registration
                    .roll_number
                    .as_deref()
                    .map(str::trim)
                    .filter(|roll| !roll.is_empty()),
            })?
            .without_refresh();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(AuthError::from_registration)?;
        let message = response
            .json::<MessageResponse>()
            .unwrap_or_default()
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| REGISTERED.to_string());

        info!("registration submitted");
        Ok(message)
    }

    /// End the session. The backend call is best-effort; the store is cleared
    /// regardless of its outcome.
    pub async fn logout(&self) {
        self.state.begin();
        let request = RequestDescriptor::post(LOGOUT_PATH).without_refresh();
        if let Err(err) = self.client.execute(request).await {
            warn!("logout request failed: {err}");
        }
        self.store().clear();
        self.state.signed_out();
        info!("signed out");
    }

    /// Replace the access token using the stored refresh token.
    /// # Errors
    /// Returns `AuthError::Authentication` when no session is stored or the
    /// refresh is rejected; the store is cleared in the latter case.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let Some(session) = self.store().get() else {
            return Err(AuthError::Authentication("not signed in".to_string()));
        };

        match self.client.refresh_access_token(&session.refresh_token).await {
            Ok(access_token) => {
                self.store()
                    .set(access_token, session.refresh_token, session.user);
                info!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!("token refresh failed: {err}");
                self.store().clear();
                self.state.signed_out();
                Err(AuthError::session_expired())
            }
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.store().get().map(|session| session.user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store().is_authenticated()
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.has_any_role(&[role])
    }

    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.store()
            .get()
            .is_some_and(|session| roles.contains(&session.user.role))
    }

    #[must_use]
    pub fn is_student(&self) -> bool {
        self.has_role(Role::Student)
    }

    #[must_use]
    pub fn is_administrator(&self) -> bool {
        self.has_role(Role::Administrator)
    }
}

fn validate_registration(registration: &Registration) -> Result<(), AuthError> {
    if registration.username.trim().is_empty() {
        return Err(AuthError::validation("username", "Username is required"));
    }
    if !valid_email(registration.email.trim()) {
        return Err(AuthError::validation("email", "Enter a valid email address"));
    }
    if registration.password.expose_secret().is_empty() {
        return Err(AuthError::validation("password", "Password is required"));
    }
    if registration.full_name.trim().is_empty() {
        return Err(AuthError::validation("full_name", "Full name is required"));
    }
    Ok(())
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}
