use crate::{
    cli::actions::print_json,
    library::{BorrowStatus, Library},
    session::guard::ViewConfig,
    store::Role,
};
use anyhow::Result;

#[derive(Debug)]
pub enum Command {
    List {
        status: Option<BorrowStatus>,
        page: Option<u32>,
    },
    Take(u64),
    Return(u64),
    Renew(u64),
    History {
        page: Option<u32>,
    },
    Stats,
}

/// Borrowing is for students only.
#[must_use]
pub fn view() -> ViewConfig {
    ViewConfig::roles(&[Role::Student])
}

/// # Errors
/// Returns an error if the backend call fails.
pub async fn execute(command: Command, library: &Library) -> Result<()> {
    match command {
        Command::List { status, page } => print_json(&library.borrowed(status, page).await?),
        Command::Take(book_id) => print_json(&library.borrow(book_id).await?),
        Command::Return(borrow_id) => print_json(&library.return_book(borrow_id).await?),
        Command::Renew(borrow_id) => print_json(&library.renew(borrow_id).await?),
        Command::History { page } => print_json(&library.history(page).await?),
        Command::Stats => print_json(&library.student_stats().await?),
    }
}
