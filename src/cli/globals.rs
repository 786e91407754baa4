use crate::{
    client::ApiClient,
    session::SessionManager,
    store::{FileTokenStore, TokenStore},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Duration};
use url::Url;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: Url,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: Url, session_file: PathBuf, timeout: Duration) -> Self {
        Self {
            api_url,
            session_file,
            timeout,
        }
    }

    /// Session manager backed by the on-disk session file.
    /// # Errors
    /// Returns an error if the HTTP client cannot be built for `api_url`.
    pub fn session_manager(&self) -> Result<SessionManager> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::open(&self.session_file));
        let client = ApiClient::new(&self.api_url, self.timeout, store)
            .with_context(|| format!("invalid API URL: {}", self.api_url))?;
        Ok(SessionManager::new(client))
    }
}

/// `$HOME/.libris/session.json`, or a relative `.libris/session.json` without a home.
#[must_use]
pub fn default_session_file() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(PathBuf::new, PathBuf::from)
        .join(".libris")
        .join("session.json")
}
