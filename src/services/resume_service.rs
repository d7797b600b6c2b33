use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::resume_dto::GenerateResumePayload;
use crate::error::{Error, Result};
use crate::models::resume::{NewResume, Resume, ResumeContent};
use crate::models::template::StyleCatalog;
use crate::models::user::NewUser;
use crate::services::pdf_service::PdfService;
use crate::services::scoring_service::{ScoreReport, ScoringService};
use crate::storage::ResumeStore;

/// Drives a submission end to end: normalize, validate, resolve the user,
/// score, render the document to disk and record the row.
#[derive(Clone)]
pub struct ResumeService {
    store: Arc<dyn ResumeStore>,
    scoring: ScoringService,
    catalog: Arc<StyleCatalog>,
    documents_dir: PathBuf,
    sequence: Arc<AtomicU64>,
}

impl ResumeService {
    pub fn new(store: Arc<dyn ResumeStore>, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            scoring: ScoringService::new(),
            catalog: Arc::new(StyleCatalog::built_in()),
            documents_dir: documents_dir.into(),
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn generate(
        &self,
        payload: GenerateResumePayload,
    ) -> Result<(Resume, ScoreReport)> {
        let style = self
            .catalog
            .resolve(payload.template_style.as_deref().unwrap_or(""));
        let content = payload.into_content();

        let missing = missing_required_fields(&content);
        if !missing.is_empty() {
            return Err(Error::Validation(missing));
        }

        let user = self
            .store
            .create_user(NewUser {
                name: content.name.clone(),
                email: content.email.clone(),
                title: content.title.clone(),
                phone: content.phone.clone(),
                location: content.location.clone(),
                website: content.website.clone(),
                linkedin: content.linkedin.clone(),
                github: content.github.clone(),
            })
            .await?;

        let report = self.scoring.score(&content);
        let pdf_bytes = PdfService::render(&content, style)?;
        let pdf_path = self.write_document(&content.email, &pdf_bytes).await?;

        let resume = match self
            .store
            .create_resume(NewResume {
                user_id: user.id,
                template_style: style.name.to_string(),
                score: report.score,
                pdf_path: pdf_path.clone(),
            })
            .await
        {
            Ok(resume) => resume,
            Err(err) => {
                // The row is the source of truth. Drop the orphaned file so a
                // failed insert leaves nothing behind.
                if let Err(cleanup) = tokio::fs::remove_file(&pdf_path).await {
                    warn!("failed to remove orphaned document {}: {}", pdf_path, cleanup);
                }
                return Err(err);
            }
        };

        info!(
            "generated resume {} for {} (style {}, score {})",
            resume.id, user.email, resume.template_style, resume.score
        );
        Ok((resume, report))
    }

    /// Read the stored document and bump its download counter. The counter
    /// only moves after the file read succeeds.
    pub async fn download(&self, id: Uuid) -> Result<(Vec<u8>, String)> {
        let resume = self
            .store
            .find_resume(id)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;

        let bytes = tokio::fs::read(&resume.pdf_path).await.map_err(|err| {
            Error::Internal(format!(
                "stored document {} is unreadable: {}",
                resume.pdf_path, err
            ))
        })?;

        self.store
            .increment_download(id)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;

        Ok((bytes, format!("resume_{}.pdf", id)))
    }

    pub async fn list_for_email(&self, email: &str) -> Result<Vec<Resume>> {
        self.store.list_resumes_for_email(email.trim()).await
    }

    async fn write_document(&self, email: &str, bytes: &[u8]) -> Result<String> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let filename = format!(
            "{}_{}_{}.pdf",
            sanitize_stem(email),
            Utc::now().timestamp_micros(),
            sequence
        );
        let path = self.documents_dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Fields a submission cannot omit, reported in payload order.
fn missing_required_fields(content: &ResumeContent) -> Vec<String> {
    let mut missing = Vec::new();
    if content.name.is_empty() {
        missing.push("name".to_string());
    }
    if content.email.is_empty() {
        missing.push("email".to_string());
    }
    if content.title.is_empty() {
        missing.push("title".to_string());
    }
    if content.experience.is_empty() {
        missing.push("experience".to_string());
    }
    if content.education.is_empty() {
        missing.push("education".to_string());
    }
    if content.skills.is_empty() {
        missing.push("skills".to_string());
    }
    missing
}

fn sanitize_stem(email: &str) -> String {
    email
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStore;
    use serde_json::json;

    fn service(dir: &std::path::Path) -> (ResumeService, Arc<MemStore>) {
        let store = Arc::new(MemStore::new());
        let service = ResumeService::new(store.clone(), dir);
        (service, store)
    }

    fn full_payload() -> GenerateResumePayload {
        serde_json::from_value(json!({
            "name": "Ada Lovelace",
            "email": "ada@x.com",
            "title": "Engineer",
            "phone": "+1-555-0100",
            "location": "London",
            "skills": "Python, C++, SQL, AWS, Git",
            "education": "BSc CS, X University, 2010",
            "experience": "Line1\nLine2\nLine3\nLine4",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn generate_persists_row_and_document() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(dir.path());

        let (resume, report) = service.generate(full_payload()).await.unwrap();

        assert_eq!(resume.score, 55);
        assert_eq!(report.score, 55);
        assert_eq!(resume.template_style, "modern");
        assert_eq!(resume.downloaded_count, 0);

        let on_disk = std::fs::read(&resume.pdf_path).unwrap();
        assert!(on_disk.starts_with(b"%PDF"));
        assert_eq!(store.count_resumes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_fields_are_reported_together() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(dir.path());

        let payload: GenerateResumePayload =
            serde_json::from_value(json!({ "name": "Ada Lovelace" })).unwrap();
        let err = service.generate(payload).await.unwrap_err();

        match err {
            Error::Validation(fields) => {
                assert_eq!(
                    fields,
                    vec!["email", "title", "experience", "education", "skills"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeat_email_reuses_the_user_row() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(dir.path());

        let (first, _) = service.generate(full_payload()).await.unwrap();
        let mut second_payload = full_payload();
        second_payload.name = Some("A. Lovelace".to_string());
        let (second, _) = service.generate(second_payload).await.unwrap();

        assert_eq!(first.user_id, second.user_id);
        assert_ne!(first.id, second.id);
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.count_resumes().await.unwrap(), 2);

        // Identity stays as first captured.
        let user = store.find_user_by_email("ada@x.com").await.unwrap().unwrap();
        assert_eq!(user.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn unknown_style_is_stored_as_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path());

        let mut payload = full_payload();
        payload.template_style = Some("brutalist".to_string());
        let (resume, _) = service.generate(payload).await.unwrap();

        assert_eq!(resume.template_style, "modern");
    }

    #[tokio::test]
    async fn download_returns_bytes_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(dir.path());
        let (resume, _) = service.generate(full_payload()).await.unwrap();

        let (bytes, filename) = service.download(resume.id).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(filename, format!("resume_{}.pdf", resume.id));

        service.download(resume.id).await.unwrap();
        let stored = store.find_resume(resume.id).await.unwrap().unwrap();
        assert_eq!(stored.downloaded_count, 2);
    }

    #[tokio::test]
    async fn download_of_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path());

        let err = service.download(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn unreadable_document_fails_without_counting() {
        let dir = tempfile::tempdir().unwrap();
        let (service, store) = service(dir.path());
        let (resume, _) = service.generate(full_payload()).await.unwrap();

        std::fs::remove_file(&resume.pdf_path).unwrap();
        let err = service.download(resume.id).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));

        let stored = store.find_resume(resume.id).await.unwrap().unwrap();
        assert_eq!(stored.downloaded_count, 0);
    }

    #[tokio::test]
    async fn unwritable_documents_dir_fails_cleanly() {
        // Point the documents dir at a regular file so the write fails.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let (service, store) = service(&blocker);

        let err = service.generate(full_payload()).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));

        // The user row is kept, the resume row is not.
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.count_resumes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn listing_is_newest_first_per_email() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service(dir.path());

        let (first, _) = service.generate(full_payload()).await.unwrap();
        let (second, _) = service.generate(full_payload()).await.unwrap();

        let listed = service.list_for_email(" ada@x.com ").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);

        assert!(service.list_for_email("nobody@x.com").await.unwrap().is_empty());
    }

    #[test]
    fn email_stems_are_filesystem_safe() {
        assert_eq!(sanitize_stem("Ada.L@x.com"), "ada_l_x_com");
        assert_eq!(sanitize_stem("weird+tag@host"), "weird_tag_host");
    }
}
