use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of project videos every page carries.
pub const VIDEOS_PER_PAGE: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recruiter {
    pub name: String,
    #[serde(default)]
    pub position: String,
    pub company: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub loom_url: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub linkedin: String,
    pub resume_url: String,
}

/// One generated recruiter-facing page, as persisted in the tracker file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: String,
    pub recruiter: Recruiter,
    pub videos: Vec<VideoEntry>,
    pub contact: Contact,
    pub created_at: DateTime<Utc>,
    pub views: u64,
    pub last_viewed: Option<DateTime<Utc>>,
}

/// Validated input for `PageStore::create`. The store fills in the rest.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub recruiter: Recruiter,
    pub videos: Vec<VideoEntry>,
    pub contact: Contact,
}

/// Body of `POST /api/create-page`. `contact` falls back to the deployment
/// default when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageRequest {
    pub recruiter: Recruiter,
    pub videos: Vec<VideoEntry>,
    pub contact: Option<Contact>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageResponse {
    pub success: bool,
    pub page_url: String,
}

impl PageRecord {
    pub fn url_path(&self) -> String {
        format!("/view/{}", self.id)
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id.clone(),
            recruiter_name: self.recruiter.name.clone(),
            recruiter_company: self.recruiter.company.clone(),
            created_at: self.created_at,
            views: self.views,
            last_viewed: self.last_viewed,
        }
    }
}

/// Redacted projection returned by `/api/stats`: no video or contact detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub recruiter_name: String,
    pub recruiter_company: String,
    pub created_at: DateTime<Utc>,
    pub views: u64,
    pub last_viewed: Option<DateTime<Utc>>,
}
