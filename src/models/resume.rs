use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_style: String,
    pub score: i32,
    pub pdf_path: String,
    pub downloaded_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: Uuid,
    pub template_style: String,
    pub score: i32,
    pub pdf_path: String,
}

/// Canonical resume content after normalization: multi-value fields are
/// trimmed line/item lists with empty entries dropped, regardless of whether
/// the client sent delimited strings or arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeContent {
    pub name: String,
    pub email: String,
    pub title: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub certificates: Vec<String>,
}

impl ResumeContent {
    pub fn has_online_presence(&self) -> bool {
        self.website.is_some() || self.linkedin.is_some() || self.github.is_some()
    }
}
