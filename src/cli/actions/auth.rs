use crate::{
    cli::actions::print_json,
    session::{guard::ViewConfig, Registration, SessionManager},
    store::Role,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde_json::json;

#[derive(Debug)]
pub enum Command {
    Login {
        username: String,
        password: SecretString,
        admin: bool,
    },
    Register(Registration),
    Logout,
    Whoami,
}

impl Command {
    #[must_use]
    pub fn view(&self) -> ViewConfig {
        match self {
            Self::Login { .. } | Self::Register(_) => ViewConfig::public(),
            Self::Logout | Self::Whoami => ViewConfig::authenticated(),
        }
    }
}

/// # Errors
/// Returns the session manager's error for a failed login or registration.
pub async fn execute(command: Command, session: &SessionManager) -> Result<()> {
    match command {
        Command::Login {
            username,
            password,
            admin,
        } => {
            let established = if admin {
                session
                    .login_as(&username, &password, Role::Administrator)
                    .await?
            } else {
                session.login(&username, &password).await?
            };
            print_json(&json!({
                "message": "signed in",
                "user": established.user,
            }))
        }
        Command::Register(registration) => {
            let message = session.register(&registration).await?;
            print_json(&json!({ "message": message }))
        }
        Command::Logout => {
            session.logout().await;
            print_json(&json!({ "message": "signed out" }))
        }
        Command::Whoami => {
            let user = session.current_user().context("not signed in")?;
            print_json(&user)
        }
    }
}
