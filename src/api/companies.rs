//! Company endpoints: registration, review, profile, logo upload.

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::models::{Company, CompanyStatus, CompanyUpdate, NewCompany};

use super::{ApiClient, ApiError};

/// Body for the super-admin review endpoint
#[derive(serde::Serialize)]
struct StatusChange {
    status: CompanyStatus,
}

impl ApiClient {
    /// Register a company for the signed-in company admin. The new company
    /// starts in pending state until a super admin reviews it.
    pub async fn register_company(&self, new_company: &NewCompany) -> Result<Company, ApiError> {
        self.post("/companies", new_company, "Failed to register company")
            .await
    }

    /// Public company profile
    pub async fn fetch_company(&self, company_id: &str) -> Result<Company, ApiError> {
        let path = format!("/companies/{}", company_id);
        self.get_public(&path, "Failed to fetch company").await
    }

    /// All companies, optionally filtered by review status (super admin)
    pub async fn list_companies(
        &self,
        status: Option<CompanyStatus>,
    ) -> Result<Vec<Company>, ApiError> {
        let builder = self.authed(Method::GET, "/companies").await?;
        let builder = match status {
            Some(status) => builder.query(&[("status", status)]),
            None => builder,
        };
        self.execute(builder, "Failed to list companies").await
    }

    /// Update the company profile
    pub async fn update_company(
        &self,
        company_id: &str,
        update: &CompanyUpdate,
    ) -> Result<Company, ApiError> {
        let path = format!("/companies/{}", company_id);
        self.put(&path, update, "Failed to update company").await
    }

    /// Approve or reject a pending company (super admin)
    pub async fn review_company(
        &self,
        company_id: &str,
        status: CompanyStatus,
    ) -> Result<Company, ApiError> {
        let path = format!("/companies/{}/status", company_id);
        self.patch(&path, &StatusChange { status }, "Failed to review company")
            .await
    }

    /// Upload a company logo as multipart form data
    pub async fn upload_logo(
        &self,
        company_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Company, ApiError> {
        let path = format!("/companies/{}/logo", company_id);
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        self.post_multipart(&path, form, "Failed to upload logo")
            .await
    }
}
