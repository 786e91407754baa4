pub mod admin;
pub mod auth;
pub mod books;
pub mod borrow;

mod run;

use crate::{cli::globals::GlobalArgs, session::guard::ViewConfig};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Auth(auth::Command),
    Books(books::Command),
    Borrow(borrow::Command),
    Admin(admin::Command),
}

impl Action {
    /// Access requirements checked by the route guard before the action runs.
    #[must_use]
    pub fn view(&self) -> ViewConfig {
        match self {
            Self::Auth(command) => command.view(),
            Self::Books(command) => command.view(),
            Self::Borrow(_) => borrow::view(),
            Self::Admin(_) => admin::view(),
        }
    }

    /// Execute the action.
    /// # Errors
    /// Returns an error if the guard refuses the action or the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        run::execute(self, globals).await
    }
}

/// Command output goes to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
