use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "submitted")]
    Submitted,
    #[serde(rename = "shortlisted")]
    Shortlisted,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "hired")]
    Hired,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Submitted => write!(f, "Submitted"),
            ApplicationStatus::Shortlisted => write!(f, "Shortlisted"),
            ApplicationStatus::Rejected => write!(f, "Rejected"),
            ApplicationStatus::Hired => write!(f, "Hired"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(rename = "jobTitle")]
    pub job_title: Option<String>,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "candidateName")]
    pub candidate_name: Option<String>,
    pub status: ApplicationStatus,
    #[serde(rename = "coverLetter")]
    pub cover_letter: Option<String>,
    #[serde(rename = "appliedAt")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Whether the application is still in play from the candidate's side
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ApplicationStatus::Submitted | ApplicationStatus::Shortlisted
        )
    }
}

/// Payload for applying to a job
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewApplication {
    #[serde(rename = "coverLetter", skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
}

/// Payload for a status change by a company admin
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
}
