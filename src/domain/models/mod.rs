pub mod auth;
pub mod location;
pub mod notification;
pub mod property;
pub mod role;
pub mod user;
