//! Typed wrappers over the catalog, borrowing and administration endpoints.
//! Every call goes through [`ApiClient::execute`], so credentials and silent
//! refresh are handled by the client core.

mod admin;
mod books;
mod borrow;
pub mod types;

pub use types::{
    Ack, Book, BookInput, BookQuery, BorrowRecord, BorrowStatus, BulkUploadReport, CreatedBook,
    Page, PendingRegistration, RegistrationAction, RenewedLoan, StudentDue, StudentStats,
};

use crate::client::ApiClient;

#[derive(Debug, Clone)]
pub struct Library {
    client: ApiClient,
}

impl Library {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}
