//! Observable authentication state. The session manager is the only writer; views
//! and the route guard read snapshots or subscribe for changes.

use crate::{
    client::SessionListener,
    store::{Role, User},
};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// State before the token store has been read.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
            error: None,
        }
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Write side of the state channel.
#[derive(Clone)]
pub struct StatePublisher {
    tx: Arc<watch::Sender<AuthState>>,
}

impl StatePublisher {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::initial());
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub(crate) fn begin(&self) {
        self.tx.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    pub(crate) fn signed_in(&self, user: User) {
        self.tx.send_modify(|state| {
            state.user = Some(user);
            state.is_authenticated = true;
            state.loading = false;
            state.error = None;
        });
    }

    pub(crate) fn signed_out(&self) {
        self.tx.send_modify(|state| {
            state.user = None;
            state.is_authenticated = false;
            state.loading = false;
        });
    }

    pub(crate) fn hydrated(&self, user: Option<User>) {
        self.tx.send_modify(|state| {
            state.is_authenticated = user.is_some();
            state.user = user;
            state.loading = false;
        });
    }

    /// Finish an operation that left the session untouched.
    pub(crate) fn finished(&self, error: Option<String>) {
        self.tx.send_modify(|state| {
            state.loading = false;
            state.error = error;
        });
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionListener for StatePublisher {
    fn session_ended(&self) {
        self.signed_out();
    }
}
