use crate::store::User;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
    pub department: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<&'a str>,
}

#[derive(Deserialize, Default)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Self-registration form. Accounts start unapproved until an administrator
/// reviews them.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub full_name: String,
    pub department: String,
    pub roll_number: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .field("full_name", &self.full_name)
            .field("department", &self.department)
            .field("roll_number", &self.roll_number)
            .finish()
    }
}
