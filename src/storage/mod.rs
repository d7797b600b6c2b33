pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::admin::Admin;
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{NewUser, User};

/// Persistence operations behind the resume pipeline. The Postgres
/// implementation backs deployments; the in-memory one backs tests and
/// development runs without a database.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create_admin(&self, username: &str, email: &str, password_hash: &str)
        -> Result<Admin>;
    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>>;

    /// Create-or-fetch keyed on the unique email: when a concurrent request
    /// wins the insert race, the winner's row is returned unchanged.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>>;
    async fn count_users(&self) -> Result<i64>;

    async fn create_resume(&self, resume: NewResume) -> Result<Resume>;
    async fn find_resume(&self, id: Uuid) -> Result<Option<Resume>>;
    async fn list_resumes_for_email(&self, email: &str) -> Result<Vec<Resume>>;
    async fn list_resumes(&self, skip: i64, limit: i64) -> Result<Vec<Resume>>;
    async fn count_resumes(&self) -> Result<i64>;
    async fn sum_downloads(&self) -> Result<i64>;

    /// Atomic increment; `None` when the id does not exist.
    async fn increment_download(&self, id: Uuid) -> Result<Option<Resume>>;
}
