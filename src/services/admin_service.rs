use std::sync::Arc;

use tracing::info;

use crate::dto::admin_dto::{AdminLoginPayload, AdminSignupPayload, StatsResponse, TokenResponse};
use crate::error::{Error, Result};
use crate::models::admin::Admin;
use crate::models::resume::Resume;
use crate::models::user::User;
use crate::storage::ResumeStore;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::issue_admin_token;

const BAD_CREDENTIALS: &str = "Incorrect username or password";

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn ResumeStore>,
}

impl AdminService {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        Self { store }
    }

    pub async fn provision(&self, payload: AdminSignupPayload) -> Result<Admin> {
        let password_hash = hash_password(&payload.password)?;
        let admin = self
            .store
            .create_admin(&payload.username, &payload.email, &password_hash)
            .await?;
        info!("provisioned admin account {}", admin.username);
        Ok(admin)
    }

    /// Unknown usernames, wrong passwords and deactivated accounts all get
    /// the same answer, so probing the endpoint reveals nothing.
    pub async fn login(&self, payload: AdminLoginPayload) -> Result<TokenResponse> {
        let admin = self
            .store
            .find_admin_by_username(&payload.username)
            .await?
            .ok_or_else(|| Error::Unauthorized(BAD_CREDENTIALS.to_string()))?;

        if !admin.is_active || !verify_password(&payload.password, &admin.password_hash)? {
            return Err(Error::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        Ok(TokenResponse {
            access_token: issue_admin_token(&admin.username)?,
            token_type: "bearer".to_string(),
        })
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        Ok(StatsResponse {
            total_users: self.store.count_users().await?,
            total_resumes: self.store.count_resumes().await?,
            total_downloads: self.store.sum_downloads().await?,
        })
    }

    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        self.store.list_users(skip, limit).await
    }

    pub async fn list_resumes(&self, skip: i64, limit: i64) -> Result<Vec<Resume>> {
        self.store.list_resumes(skip, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemStore;

    fn service() -> AdminService {
        AdminService::new(Arc::new(MemStore::new()))
    }

    fn signup(username: &str) -> AdminSignupPayload {
        AdminSignupPayload {
            username: username.to_string(),
            email: format!("{}@corp.example", username),
            password: "correct horse battery".to_string(),
        }
    }

    #[tokio::test]
    async fn provision_stores_a_verifiable_hash() {
        let service = service();
        let admin = service.provision(signup("boss")).await.unwrap();

        assert_eq!(admin.username, "boss");
        assert_ne!(admin.password_hash, "correct horse battery");
        assert!(verify_password("correct horse battery", &admin.password_hash).unwrap());
        assert!(!verify_password("wrong", &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let service = service();
        service.provision(signup("boss")).await.unwrap();

        let err = service.provision(signup("boss")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_username_and_wrong_password_answer_alike() {
        let service = service();
        service.provision(signup("boss")).await.unwrap();

        let unknown = service
            .login(AdminLoginPayload {
                username: "nobody".to_string(),
                password: "whatever".to_string(),
            })
            .await
            .unwrap_err();
        let wrong = service
            .login(AdminLoginPayload {
                username: "boss".to_string(),
                password: "not the password".to_string(),
            })
            .await
            .unwrap_err();

        match (unknown, wrong) {
            (Error::Unauthorized(a), Error::Unauthorized(b)) => assert_eq!(a, b),
            other => panic!("expected two 401s, got {:?}", other),
        }
    }
}
