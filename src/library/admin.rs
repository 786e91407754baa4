use super::{
    types::{Ack, Page, PendingRegistration, RegistrationAction, RegistrationActionBody, StudentDue},
    Library,
};
use crate::client::{ApiError, RequestDescriptor};
use serde_json::Value;
use tracing::{info, instrument};

const ADMIN: &str = "/api/admin";

impl Library {
    /// Student registrations awaiting review.
    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn pending_registrations(
        &self,
        page: Option<u32>,
    ) -> Result<Page<PendingRegistration>, ApiError> {
        let request = RequestDescriptor::get(format!("{ADMIN}/registrations/pending/"))
            .param_opt("page", page);
        self.client.execute_json(request).await
    }

    /// Approve or reject a registration. Rejection deletes the account.
    /// # Errors
    /// Returns `ApiError::Http` when the registration is unknown or already approved.
    #[instrument(skip(self))]
    pub async fn registration_action(
        &self,
        registration_id: u64,
        action: &RegistrationAction,
    ) -> Result<Ack, ApiError> {
        let request = RequestDescriptor::post(format!(
            "{ADMIN}/registrations/{registration_id}/action/"
        ))
        .json(&RegistrationActionBody::from(action))?;
        let ack: Ack = self.client.execute_json(request).await?;
        info!(registration_id, action = action.as_str(), "registration reviewed");
        Ok(ack)
    }

    /// Approved students ordered by outstanding fines, optionally only those owing
    /// at least `min_due`.
    /// # Errors
    /// Returns an error if the request fails or the page cannot be decoded.
    pub async fn students_with_dues(
        &self,
        min_due: Option<f64>,
        page: Option<u32>,
    ) -> Result<Page<StudentDue>, ApiError> {
        let request = RequestDescriptor::get(format!("{ADMIN}/students/dues/"))
            .param_opt("min_due", min_due)
            .param_opt("page", page);
        self.client.execute_json(request).await
    }

    /// Dashboard counters and recent activity, passed through as returned.
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn dashboard_stats(&self) -> Result<Value, ApiError> {
        self.client
            .execute_json(RequestDescriptor::get(format!("{ADMIN}/dashboard/stats/")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::test_support::{can_bind_localhost, library};
    use anyhow::Result;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reject_sends_reason() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/registrations/12/action/"))
            .and(body_json(json!({"action": "reject", "reason": "duplicate"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Student registration rejected and account deleted",
                "status": "rejected"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ack = library(&server)
            .registration_action(
                12,
                &RegistrationAction::Reject {
                    reason: Some("duplicate".to_string()),
                },
            )
            .await?;
        assert_eq!(ack.extra.get("status"), Some(&json!("rejected")));
        Ok(())
    }

    #[tokio::test]
    async fn dues_pass_min_due() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/students/dues/"))
            .and(query_param("min_due", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{
                    "id": 4,
                    "username": "sam",
                    "email": "sam@college.edu",
                    "total_fines": "75.00",
                    "borrowed_count": 2
                }]
            })))
            .mount(&server)
            .await;

        let page = library(&server).students_with_dues(Some(50.0), None).await?;
        assert_eq!(page.results[0].total_fines, "75.00");
        Ok(())
    }

    #[tokio::test]
    async fn pending_registrations_page() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/registrations/pending/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1,
                "next": null,
                "previous": null,
                "results": [{
                    "id": 12,
                    "email": "new@college.edu",
                    "name": "New Student",
                    "roll_number": "CS-001",
                    "department": "CS",
                    "status": "pending"
                }]
            })))
            .mount(&server)
            .await;

        let page = library(&server).pending_registrations(None).await?;
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].roll_number.as_deref(), Some("CS-001"));
        Ok(())
    }
}
