pub mod admin_service;
pub mod pdf_service;
pub mod resume_service;
pub mod scoring_service;
