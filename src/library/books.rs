use super::{
    types::{Ack, Book, BookInput, BookQuery, BulkUploadReport, CreatedBook, Page},
    Library,
};
use crate::client::{ApiError, RequestDescriptor};
use tracing::instrument;

const BOOKS: &str = "/api/books";

impl Library {
    /// Catalog listing with optional search, category filter, ordering and paging.
    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_books(&self, query: &BookQuery) -> Result<Page<Book>, ApiError> {
        let request = RequestDescriptor::get(format!("{BOOKS}/list/"))
            .param_opt("search", query.search.as_deref())
            .param_opt("category", query.category.as_deref())
            .param_opt("ordering", query.ordering.as_deref())
            .param_opt("page", query.page)
            .param_opt("page_size", query.page_size);
        self.client.execute_json(request).await
    }

    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn search_books(&self, search: &str) -> Result<Page<Book>, ApiError> {
        self.list_books(&BookQuery {
            search: Some(search.to_string()),
            ..BookQuery::default()
        })
        .await
    }

    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn books_by_category(&self, category: &str) -> Result<Page<Book>, ApiError> {
        self.list_books(&BookQuery {
            category: Some(category.to_string()),
            ..BookQuery::default()
        })
        .await
    }

    /// # Errors
    /// Returns `ApiError::Http` with status 404 for an unknown id.
    pub async fn book(&self, id: u64) -> Result<Book, ApiError> {
        self.client
            .execute_json(RequestDescriptor::get(format!("{BOOKS}/detail/{id}/")))
            .await
    }

    /// Distinct category names, sorted.
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn categories(&self) -> Result<Vec<String>, ApiError> {
        self.client
            .execute_json(RequestDescriptor::get(format!("{BOOKS}/categories/")))
            .await
    }

    /// # Errors
    /// Returns an error if the backend rejects the book.
    #[instrument(skip(self, input), fields(isbn = ?input.isbn))]
    pub async fn create_book(&self, input: &BookInput) -> Result<CreatedBook, ApiError> {
        let request = RequestDescriptor::post(format!("{BOOKS}/add/")).json(input)?;
        self.client.execute_json(request).await
    }

    /// Partial update; fields left unset keep their stored value.
    /// # Errors
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, input))]
    pub async fn update_book(&self, id: u64, input: &BookInput) -> Result<Ack, ApiError> {
        let request = RequestDescriptor::put(format!("{BOOKS}/detail/{id}/")).json(input)?;
        self.client.execute_json(request).await
    }

    /// # Errors
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete_book(&self, id: u64) -> Result<Ack, ApiError> {
        self.client
            .execute_json(RequestDescriptor::delete(format!("{BOOKS}/detail/{id}/")))
            .await
    }

    /// Add many books at once. Individual failures are listed in the report;
    /// the call fails only when nothing was created.
    /// # Errors
    /// Returns `ApiError::Http` when the backend created no books.
    #[instrument(skip_all, fields(count = books.len()))]
    pub async fn bulk_upload(&self, books: &[BookInput]) -> Result<BulkUploadReport, ApiError> {
        let request = RequestDescriptor::post(format!("{BOOKS}/bulk-upload/")).json(books)?;
        self.client.execute_json(request).await
    }
}
