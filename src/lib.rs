//! # Libris (campus library client)
//!
//! `libris` talks to the campus library backend: catalog browsing and search,
//! borrowing, returns and renewals, and book inventory administration. All
//! business rules (fines, due dates, availability) live in the backend; this
//! crate keeps the local session in sync with it.
//!
//! ## Session lifecycle
//!
//! 1. **Login:** credentials are exchanged at `/api/token/` for an access token,
//!    a refresh token and the user profile. The triple is written to the
//!    [`store::TokenStore`] in one step.
//! 2. **Requests:** every call goes through [`client::ApiClient`], which attaches
//!    the access token as `Authorization: Bearer`.
//! 3. **Recovery:** a `401` triggers exactly one silent refresh at
//!    `/api/token/refresh/` followed by one replay of the request. If the refresh
//!    fails the store is cleared and the caller gets
//!    [`client::ApiError::SessionEnded`].
//! 4. **Logout:** best-effort remote logout, then the store is always cleared.
//!
//! Token material is kept in `secrecy::SecretString` and must never be logged.

pub mod cli;
pub mod client;
pub mod library;
pub mod session;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
