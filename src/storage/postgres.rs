use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::admin::Admin;
use crate::models::resume::{NewResume, Resume};
use crate::models::user::{NewUser, User};
use crate::storage::ResumeStore;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, username, email, password_hash, is_active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING id, username, email, password_hash, is_active, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::Conflict("An admin with this username or email already exists".to_string())
            } else {
                Error::from(err)
            }
        })?;
        Ok(admin)
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, username, email, password_hash, is_active, created_at
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, title, phone, location, website, linkedin, github, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, title, phone, location, website, linkedin, github, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.title)
        .bind(&user.phone)
        .bind(&user.location)
        .bind(&user.website)
        .bind(&user.linkedin)
        .bind(&user.github)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(created) => Ok(created),
            // Lost the insert race on the email index; the existing row wins.
            None => {
                let existing = sqlx::query_as::<_, User>(
                    r#"
                    SELECT id, name, email, title, phone, location, website, linkedin, github, created_at
                    FROM users
                    WHERE email = $1
                    "#,
                )
                .bind(&user.email)
                .fetch_one(&self.pool)
                .await?;
                Ok(existing)
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, title, phone, location, website, linkedin, github, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, title, phone, location, website, linkedin, github, created_at
            FROM users
            ORDER BY created_at
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume> {
        let created = sqlx::query_as::<_, Resume>(
            r#"
            INSERT INTO resumes (id, user_id, template_style, score, pdf_path, downloaded_count, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING id, user_id, template_style, score, pdf_path, downloaded_count, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resume.user_id)
        .bind(&resume.template_style)
        .bind(resume.score)
        .bind(&resume.pdf_path)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<Resume>> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, user_id, template_style, score, pdf_path, downloaded_count, created_at
            FROM resumes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(resume)
    }

    async fn list_resumes_for_email(&self, email: &str) -> Result<Vec<Resume>> {
        let resumes = sqlx::query_as::<_, Resume>(
            r#"
            SELECT r.id, r.user_id, r.template_style, r.score, r.pdf_path, r.downloaded_count, r.created_at
            FROM resumes r
            JOIN users u ON u.id = r.user_id
            WHERE u.email = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }

    async fn list_resumes(&self, skip: i64, limit: i64) -> Result<Vec<Resume>> {
        let resumes = sqlx::query_as::<_, Resume>(
            r#"
            SELECT id, user_id, template_style, score, pdf_path, downloaded_count, created_at
            FROM resumes
            ORDER BY created_at
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }

    async fn count_resumes(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM resumes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn sum_downloads(&self) -> Result<i64> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(downloaded_count), 0) FROM resumes")
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    async fn increment_download(&self, id: Uuid) -> Result<Option<Resume>> {
        let resume = sqlx::query_as::<_, Resume>(
            r#"
            UPDATE resumes
            SET downloaded_count = downloaded_count + 1
            WHERE id = $1
            RETURNING id, user_id, template_style, score, pdf_path, downloaded_count, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(resume)
    }
}
