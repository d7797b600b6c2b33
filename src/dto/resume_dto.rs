use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::resume::{Resume, ResumeContent};

/// Multi-value fields arrive either pre-split or as a single delimited
/// string; both shapes canonicalize to a trimmed item list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    pub fn into_comma_items(self) -> Vec<String> {
        match self {
            TextOrList::Text(raw) => split_clean(&raw, ','),
            TextOrList::List(items) => clean(items),
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            TextOrList::Text(raw) => split_clean(&raw, '\n'),
            TextOrList::List(items) => clean(items),
        }
    }
}

fn split_clean(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// All fields are optional at the wire level so an incomplete submission
/// surfaces as one 400 listing every missing field, not a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerateResumePayload {
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<TextOrList>,
    pub education: Option<TextOrList>,
    pub skills: Option<TextOrList>,
    pub languages: Option<TextOrList>,
    pub certificates: Option<TextOrList>,
    pub template_style: Option<String>,
}

impl GenerateResumePayload {
    pub fn into_content(self) -> ResumeContent {
        ResumeContent {
            name: self.name.map(|v| v.trim().to_string()).unwrap_or_default(),
            email: self.email.map(|v| v.trim().to_string()).unwrap_or_default(),
            title: self.title.map(|v| v.trim().to_string()).unwrap_or_default(),
            phone: opt_trimmed(self.phone),
            location: opt_trimmed(self.location),
            website: opt_trimmed(self.website),
            linkedin: opt_trimmed(self.linkedin),
            github: opt_trimmed(self.github),
            summary: opt_trimmed(self.summary),
            experience: self.experience.map(TextOrList::into_lines).unwrap_or_default(),
            education: self.education.map(TextOrList::into_lines).unwrap_or_default(),
            skills: self.skills.map(TextOrList::into_comma_items).unwrap_or_default(),
            languages: self.languages.map(TextOrList::into_comma_items).unwrap_or_default(),
            certificates: self.certificates.map(TextOrList::into_lines).unwrap_or_default(),
        }
    }
}

fn opt_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub template_style: String,
    pub score: i32,
    pub downloaded_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Resume> for ResumeResponse {
    fn from(resume: Resume) -> Self {
        Self {
            id: resume.id,
            user_id: resume.user_id,
            template_style: resume.template_style,
            score: resume.score,
            downloaded_count: resume.downloaded_count,
            created_at: resume.created_at,
        }
    }
}

/// Body returned by resume generation: the stored record plus the
/// completeness report computed for it.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResumeResponse {
    #[serde(flatten)]
    pub resume: ResumeResponse,
    pub feedback: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResumeListQuery {
    pub email: String,
}
