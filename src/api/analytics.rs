//! Dashboard analytics endpoints. All numbers are computed server-side.

use crate::models::{CompanyAnalytics, PlatformAnalytics};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Hiring metrics for one company (company admin or super admin)
    pub async fn company_analytics(&self, company_id: &str) -> Result<CompanyAnalytics, ApiError> {
        let path = format!("/analytics/companies/{}", company_id);
        self.get(&path, "Failed to fetch company analytics").await
    }

    /// Platform-wide metrics (super admin)
    pub async fn platform_analytics(&self) -> Result<PlatformAnalytics, ApiError> {
        self.get("/analytics/platform", "Failed to fetch platform analytics")
            .await
    }
}
