use crate::{
    cli::actions::print_json,
    library::{Library, RegistrationAction},
    session::guard::ViewConfig,
    store::Role,
};
use anyhow::Result;

#[derive(Debug)]
pub enum Command {
    Registrations { page: Option<u32> },
    Review { id: u64, action: RegistrationAction },
    Dues { min_due: Option<f64>, page: Option<u32> },
    Stats,
}

#[must_use]
pub fn view() -> ViewConfig {
    ViewConfig::roles(&[Role::Administrator])
}

/// # Errors
/// Returns an error if the backend call fails.
pub async fn execute(command: Command, library: &Library) -> Result<()> {
    match command {
        Command::Registrations { page } => {
            print_json(&library.pending_registrations(page).await?)
        }
        Command::Review { id, action } => {
            print_json(&library.registration_action(id, &action).await?)
        }
        Command::Dues { min_due, page } => {
            print_json(&library.students_with_dues(min_due, page).await?)
        }
        Command::Stats => print_json(&library.dashboard_stats().await?),
    }
}
