pub mod sqlite_auth_repo;
pub mod sqlite_location_repo;
pub mod sqlite_property_repo;
pub mod sqlite_user_repo;

pub mod postgres_auth_repo;
pub mod postgres_location_repo;
pub mod postgres_property_repo;
pub mod postgres_user_repo;
