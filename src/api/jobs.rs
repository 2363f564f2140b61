//! Job and application endpoints.
//!
//! Job browsing is public; posting, editing, and everything
//! application-related requires a session. Search filtering and pagination
//! are server-side, the client just forwards the query.

use reqwest::Method;

use crate::models::{
    Application, ApplicationStatus, ApplicationStatusUpdate, Job, JobPage, JobQuery, JobUpdate,
    NewApplication, NewJob,
};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Search the public job board
    pub async fn search_jobs(&self, query: &JobQuery) -> Result<JobPage, ApiError> {
        let builder = self.public(Method::GET, "/jobs").query(query);
        self.execute(builder, "Failed to search jobs").await
    }

    /// Public job detail
    pub async fn fetch_job(&self, job_id: &str) -> Result<Job, ApiError> {
        let path = format!("/jobs/{}", job_id);
        self.get_public(&path, "Failed to fetch job").await
    }

    /// Post a new job for the admin's company
    pub async fn post_job(&self, new_job: &NewJob) -> Result<Job, ApiError> {
        self.post("/jobs", new_job, "Failed to post job").await
    }

    /// Update an existing posting
    pub async fn update_job(&self, job_id: &str, update: &JobUpdate) -> Result<Job, ApiError> {
        let path = format!("/jobs/{}", job_id);
        self.put(&path, update, "Failed to update job").await
    }

    /// Take a posting down
    pub async fn close_job(&self, job_id: &str) -> Result<(), ApiError> {
        let path = format!("/jobs/{}", job_id);
        self.delete(&path, "Failed to close job").await
    }

    /// All postings of one company, including closed ones
    pub async fn company_jobs(&self, company_id: &str) -> Result<Vec<Job>, ApiError> {
        let path = format!("/companies/{}/jobs", company_id);
        self.get(&path, "Failed to fetch company jobs").await
    }

    /// Apply to a job as the signed-in candidate
    pub async fn apply(
        &self,
        job_id: &str,
        application: &NewApplication,
    ) -> Result<Application, ApiError> {
        let path = format!("/jobs/{}/applications", job_id);
        self.post(&path, application, "Failed to submit application")
            .await
    }

    /// Applications received for one posting (company admin)
    pub async fn job_applications(&self, job_id: &str) -> Result<Vec<Application>, ApiError> {
        let path = format!("/jobs/{}/applications", job_id);
        self.get(&path, "Failed to fetch applications").await
    }

    /// The signed-in candidate's own applications
    pub async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        self.get("/users/me/applications", "Failed to fetch applications")
            .await
    }

    /// Move an application through the hiring pipeline (company admin)
    pub async fn update_application_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, ApiError> {
        let path = format!("/applications/{}", application_id);
        self.patch(
            &path,
            &ApplicationStatusUpdate { status },
            "Failed to update application",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::auth::MemoryTokenStore;
    use crate::models::JobType;

    use super::*;

    #[tokio::test]
    async fn search_forwards_filters_and_needs_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .and(query_param("search", "rust backend"))
            .and(query_param("jobType", "fullTime"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jobs": [],
                "page": 2,
                "totalPages": 2,
                "totalCount": 31
            })))
            .expect(1)
            .mount(&server)
            .await;

        // empty store on purpose: browsing must work signed out
        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(server.uri(), store).unwrap();

        let page = client
            .search_jobs(&JobQuery {
                search: Some("rust backend".into()),
                job_type: Some(JobType::FullTime),
                page: Some(2),
                ..Default::default()
            })
            .await
            .expect("job page");
        assert_eq!(page.total_count, 31);
    }

    #[tokio::test]
    async fn fetch_job_is_public() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/j-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "j-9",
                "title": "Backend Engineer",
                "description": "Build APIs",
                "location": "Remote",
                "jobType": "fullTime",
                "companyId": "c-3",
                "companyName": "Acme Robotics",
                "salaryMin": null,
                "salaryMax": null,
                "postedAt": null,
                "closesAt": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let client = ApiClient::new(server.uri(), store).unwrap();

        let job = client.fetch_job("j-9").await.expect("job");
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.job_type, JobType::FullTime);
    }
}
