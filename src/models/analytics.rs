use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hiring metrics for one company. Computed server-side; the client only
/// renders the numbers it is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAnalytics {
    #[serde(rename = "companyId")]
    pub company_id: String,
    #[serde(rename = "totalJobs")]
    pub total_jobs: u64,
    #[serde(rename = "openJobs")]
    pub open_jobs: u64,
    #[serde(rename = "totalApplications")]
    pub total_applications: u64,
    /// Counts keyed by application status wire name
    #[serde(rename = "applicationsByStatus", default)]
    pub applications_by_status: HashMap<String, u64>,
    #[serde(rename = "jobViews", default)]
    pub job_views: u64,
}

/// Platform-wide metrics for the super admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAnalytics {
    #[serde(rename = "totalUsers")]
    pub total_users: u64,
    #[serde(rename = "totalCompanies")]
    pub total_companies: u64,
    #[serde(rename = "pendingCompanies")]
    pub pending_companies: u64,
    #[serde(rename = "totalJobs")]
    pub total_jobs: u64,
    #[serde(rename = "totalApplications")]
    pub total_applications: u64,
    /// Counts keyed by job type wire name
    #[serde(rename = "jobsByType", default)]
    pub jobs_by_type: HashMap<String, u64>,
}
