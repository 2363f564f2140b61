use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "fullTime")]
    FullTime,
    #[serde(rename = "partTime")]
    PartTime,
    #[serde(rename = "contract")]
    Contract,
    #[serde(rename = "internship")]
    Internship,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::FullTime => write!(f, "Full-time"),
            JobType::PartTime => write!(f, "Part-time"),
            JobType::Contract => write!(f, "Contract"),
            JobType::Internship => write!(f, "Internship"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    #[serde(rename = "jobType")]
    pub job_type: JobType,
    #[serde(rename = "companyId")]
    pub company_id: String,
    #[serde(rename = "companyName")]
    pub company_name: Option<String>,
    #[serde(rename = "salaryMin")]
    pub salary_min: Option<i64>,
    #[serde(rename = "salaryMax")]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(rename = "isOpen", default = "default_open")]
    pub is_open: bool,
    #[serde(rename = "postedAt")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(rename = "closesAt")]
    pub closes_at: Option<DateTime<Utc>>,
}

fn default_open() -> bool {
    true
}

impl Job {
    /// Salary range for display, e.g. "45000-60000" or "from 45000"
    pub fn salary_display(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => format!("{}-{}", min, max),
            (Some(min), None) => format!("from {}", min),
            (None, Some(max)) => format!("up to {}", max),
            (None, None) => "Not specified".to_string(),
        }
    }
}

/// Search filters forwarded to `GET /jobs`. Filtering and pagination are
/// server-side; the client only builds the query string.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "jobType", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(rename = "companyId", skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// One page of job search results
#[derive(Debug, Clone, Deserialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    pub page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

/// Job posting payload
#[derive(Debug, Clone, Serialize)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "jobType")]
    pub job_type: JobType,
    #[serde(rename = "salaryMin", skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    #[serde(rename = "salaryMax", skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
    #[serde(rename = "closesAt", skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
}

/// Partial job update
#[derive(Debug, Clone, Default, Serialize)]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "jobType", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(rename = "salaryMin", skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    #[serde(rename = "salaryMax", skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    #[serde(rename = "isOpen", skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}
