use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub num_pages: Option<u32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub published_year: Option<String>,
    #[serde(default)]
    pub available_copies: i64,
}

/// Fields accepted when adding or updating a book. Unset fields are omitted from
/// the request so an update only touches what is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_copies: Option<i64>,
}

/// Catalog listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Backend acknowledgement, e.g. `{"message": "Book deleted successfully"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedBook {
    pub message: String,
    pub book_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkUploadReport {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub failed_books: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Borrowed,
    Returned,
    Overdue,
}

impl BorrowStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Borrowed => "borrowed",
            Self::Returned => "returned",
            Self::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowRecord {
    pub id: u64,
    pub book_id: u64,
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub borrow_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default)]
    pub fine_amount: Option<String>,
    pub status: BorrowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewedLoan {
    pub message: String,
    #[serde(default)]
    pub new_due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    #[serde(default)]
    pub borrowed_count: u64,
    #[serde(default)]
    pub overdue_count: u64,
    #[serde(default)]
    pub total_fines: f64,
    #[serde(default)]
    pub activities: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Decision on a pending registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationAction {
    Approve,
    Reject { reason: Option<String> },
}

impl RegistrationAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject { .. } => "reject",
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegistrationActionBody<'a> {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'a str>,
}

impl<'a> From<&'a RegistrationAction> for RegistrationActionBody<'a> {
    fn from(action: &'a RegistrationAction) -> Self {
        let reason = match action {
            RegistrationAction::Approve => None,
            RegistrationAction::Reject { reason } => reason.as_deref(),
        };
        Self {
            action: action.as_str(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDue {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub total_fines: String,
    #[serde(default)]
    pub borrowed_count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_tolerates_nulls() {
        let book: Book = serde_json::from_value(json!({
            "id": 3,
            "title": "Dune",
            "description": "Spice",
            "category": "Fiction",
            "thumbnail": null,
            "num_pages": null,
            "average_rating": 4.2,
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "published_year": null,
            "available_copies": 2
        }))
        .unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.num_pages, None);
        assert_eq!(book.available_copies, 2);
    }

    #[test]
    fn book_input_omits_unset_fields() {
        let input = BookInput {
            available_copies: Some(5),
            ..BookInput::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({"available_copies": 5})
        );
    }

    #[test]
    fn registration_action_body() {
        let approve = RegistrationAction::Approve;
        assert_eq!(
            serde_json::to_value(RegistrationActionBody::from(&approve)).unwrap(),
            json!({"action": "approve"})
        );
        let reject = RegistrationAction::Reject {
            reason: Some("duplicate roll number".to_string()),
        };
        assert_eq!(
            serde_json::to_value(RegistrationActionBody::from(&reject)).unwrap(),
            json!({"action": "reject", "reason": "duplicate roll number"})
        );
    }

    #[test]
    fn stats_use_camel_case() {
        let stats: StudentStats = serde_json::from_value(json!({
            "borrowedCount": 2,
            "overdueCount": 1,
            "totalFines": 12.5,
            "activities": []
        }))
        .unwrap();
        assert_eq!(stats.overdue_count, 1);
    }
}
