use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "candidate")]
    Candidate,
    #[serde(rename = "companyAdmin")]
    CompanyAdmin,
    #[serde(rename = "superAdmin")]
    SuperAdmin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Candidate => write!(f, "Candidate"),
            UserRole::CompanyAdmin => write!(f, "Company admin"),
            UserRole::SuperAdmin => write!(f, "Super admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(rename = "companyId")]
    pub company_id: Option<String>,
    #[serde(rename = "resumeUrl")]
    pub resume_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_resume(&self) -> bool {
        self.resume_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Partial profile update; unset fields are left unchanged server-side
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
