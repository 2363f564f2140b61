//! Data models for HireFlow entities.
//!
//! Every endpoint has an explicit request/response schema here instead of
//! untyped JSON values:
//!
//! - `User`, `UserRole`: accounts across the three roles
//! - `Company`, `CompanyStatus`: employer organizations and review state
//! - `Job`, `JobType`, `JobQuery`, `JobPage`: postings and search
//! - `Application`, `ApplicationStatus`: candidate applications
//! - `CompanyAnalytics`, `PlatformAnalytics`: dashboard metrics

pub mod analytics;
pub mod application;
pub mod company;
pub mod job;
pub mod user;

pub use analytics::{CompanyAnalytics, PlatformAnalytics};
pub use application::{Application, ApplicationStatus, ApplicationStatusUpdate, NewApplication};
pub use company::{Company, CompanyStatus, CompanyUpdate, NewCompany};
pub use job::{Job, JobPage, JobQuery, JobType, JobUpdate, NewJob};
pub use user::{NewUser, User, UserRole, UserUpdate};
