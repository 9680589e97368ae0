pub mod auth_service;
pub mod navigation;
pub mod shell;
pub mod user_service;
