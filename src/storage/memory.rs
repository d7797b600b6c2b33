use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::admin::Admin;
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{NewUser, User};
use crate::storage::ResumeStore;

/// Store backed by process memory. One mutex serializes every operation,
/// which makes the duplicate-user and lost-update guarantees immediate.
#[derive(Debug, Default)]
pub struct MemStore {
    inner: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    admins: Vec<Admin>,
    users: Vec<User>,
    resumes: Vec<Resume>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemStore {
    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Admin> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        let taken = tables
            .admins
            .iter()
            .any(|a| a.username == username || a.email == email);
        if taken {
            return Err(Error::Conflict(
                "An admin with this username or email already exists".to_string(),
            ));
        }
        let admin = Admin {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables
            .admins
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        if let Some(existing) = tables.users.iter().find(|u| u.email == user.email) {
            return Ok(existing.clone());
        }
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            title: user.title,
            phone: user.phone,
            location: user.location,
            website: user.website,
            linkedin: user.linkedin,
            github: user.github,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables
            .users
            .iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_users(&self) -> Result<i64> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables.users.len() as i64)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        let row = Resume {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            template_style: resume.template_style,
            score: resume.score,
            pdf_path: resume.pdf_path,
            downloaded_count: 0,
            created_at: Utc::now(),
        };
        tables.resumes.push(row.clone());
        Ok(row)
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables.resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes_for_email(&self, email: &str) -> Result<Vec<Resume>> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        let Some(user_id) = tables.users.iter().find(|u| u.email == email).map(|u| u.id) else {
            return Ok(Vec::new());
        };
        // Rows are stored in creation order, so newest-first is a reversal.
        let mut items: Vec<Resume> = tables
            .resumes
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        items.reverse();
        Ok(items)
    }

    async fn list_resumes(&self, skip: i64, limit: i64) -> Result<Vec<Resume>> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables
            .resumes
            .iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count_resumes(&self) -> Result<i64> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables.resumes.len() as i64)
    }

    async fn sum_downloads(&self) -> Result<i64> {
        let tables = self.inner.lock().expect("store mutex poisoned");
        Ok(tables
            .resumes
            .iter()
            .map(|r| i64::from(r.downloaded_count))
            .sum())
    }

    async fn increment_download(&self, id: Uuid) -> Result<Option<Resume>> {
        let mut tables = self.inner.lock().expect("store mutex poisoned");
        let Some(row) = tables.resumes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        row.downloaded_count += 1;
        Ok(Some(row.clone()))
    }
}
