pub mod admin_dto;
pub mod resume_dto;
