pub mod auth;
pub mod dialog;
pub mod health;
pub mod location;
pub mod pages;
pub mod profile;
pub mod properties;
pub mod users;
