//! User profile endpoints, plus the super-admin user listing.

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::models::{User, UserRole, UserUpdate};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Profile of the signed-in user
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get("/users/me", "Failed to load profile").await
    }

    /// Update the signed-in user's profile
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.put("/users/me", update, "Failed to update profile")
            .await
    }

    /// Upload a resume as multipart form data; returns the profile with the
    /// new resume URL filled in
    pub async fn upload_resume(&self, filename: &str, bytes: Vec<u8>) -> Result<User, ApiError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(filename.to_string()));
        self.post_multipart("/users/me/resume", form, "Failed to upload resume")
            .await
    }

    /// All users, optionally filtered by role (super admin)
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>, ApiError> {
        let builder = self.authed(Method::GET, "/users").await?;
        let builder = match role {
            Some(role) => builder.query(&[("role", role)]),
            None => builder,
        };
        self.execute(builder, "Failed to list users").await
    }
}
