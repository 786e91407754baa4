use super::{
    types::{Ack, BorrowRecord, BorrowStatus, Page, RenewedLoan, StudentStats},
    Library,
};
use crate::client::{ApiError, RequestDescriptor};
use serde::Serialize;
use tracing::instrument;

const BORROW: &str = "/api/borrow";

#[derive(Serialize)]
struct BorrowBody {
    book_id: u64,
}

impl Library {
    /// Loans of the signed-in student, newest first.
    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn borrowed(
        &self,
        status: Option<BorrowStatus>,
        page: Option<u32>,
    ) -> Result<Page<BorrowRecord>, ApiError> {
        let request = RequestDescriptor::get(format!("{BORROW}/borrow/"))
            .param_opt("status", status.map(BorrowStatus::as_str))
            .param_opt("page", page);
        self.client.execute_json(request).await
    }

    /// # Errors
    /// Returns `ApiError::Http` when the book is unavailable, already borrowed or
    /// the account is still pending approval.
    #[instrument(skip(self))]
    pub async fn borrow(&self, book_id: u64) -> Result<BorrowRecord, ApiError> {
        let request =
            RequestDescriptor::post(format!("{BORROW}/borrow/")).json(&BorrowBody { book_id })?;
        self.client.execute_json(request).await
    }

    /// # Errors
    /// Returns `ApiError::Http` with status 404 when the loan is unknown or closed.
    #[instrument(skip(self))]
    pub async fn return_book(&self, borrow_id: u64) -> Result<Ack, ApiError> {
        self.client
            .execute_json(RequestDescriptor::post(format!("{BORROW}/return/{borrow_id}/")))
            .await
    }

    /// # Errors
    /// Returns `ApiError::Http` with status 404 when the loan is unknown or closed.
    #[instrument(skip(self))]
    pub async fn renew(&self, borrow_id: u64) -> Result<RenewedLoan, ApiError> {
        self.client
            .execute_json(RequestDescriptor::post(format!("{BORROW}/renew/{borrow_id}/")))
            .await
    }

    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn history(&self, page: Option<u32>) -> Result<Page<BorrowRecord>, ApiError> {
        let request =
            RequestDescriptor::get(format!("{BORROW}/history/")).param_opt("page", page);
        self.client.execute_json(request).await
    }

    /// # Errors
    /// Returns an error if the request fails.
    pub async fn student_stats(&self) -> Result<StudentStats, ApiError> {
        self.client
            .execute_json(RequestDescriptor::get(format!("{BORROW}/stats/")))
            .await
    }
}
