pub mod admin;
pub mod resume;
pub mod template;
pub mod user;
