pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use crate::services::{admin_service::AdminService, resume_service::ResumeService};
use crate::storage::ResumeStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ResumeStore>,
    pub resume_service: ResumeService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        let config = crate::config::get_config();

        let resume_service = ResumeService::new(store.clone(), config.documents_dir.clone());
        let admin_service = AdminService::new(store.clone());

        Self {
            store,
            resume_service,
            admin_service,
        }
    }
}
