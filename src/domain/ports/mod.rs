use crate::domain::models::{
    auth::RefreshTokenRecord,
    location::{City, Phase, State},
    property::Property,
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
    async fn delete_expired(&self) -> Result<u64, AppError>;
}

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn create_state(&self, state: &State) -> Result<State, AppError>;
    async fn list_states(&self) -> Result<Vec<State>, AppError>;

    async fn create_city(&self, city: &City) -> Result<City, AppError>;
    async fn find_city(&self, id: &str) -> Result<Option<City>, AppError>;
    async fn list_cities(&self) -> Result<Vec<City>, AppError>;
    async fn update_city(&self, city: &City) -> Result<City, AppError>;
    async fn delete_city(&self, id: &str) -> Result<(), AppError>;

    async fn create_phase(&self, phase: &Phase) -> Result<Phase, AppError>;
    async fn list_phases(&self) -> Result<Vec<Phase>, AppError>;
}

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, property: &Property) -> Result<Property, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError>;
    async fn list(&self) -> Result<Vec<Property>, AppError>;
    async fn update(&self, property: &Property) -> Result<Property, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Lookup and mutation of users, as consumed by the shell and the edit
/// dialogs. Persistence policy (password hashing, the meaning of an empty
/// password) lives behind this trait, never in the dialog.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn create_user(&self, user: User, password: &str) -> Result<User, AppError>;
    /// Stores every field of `user`. An empty `new_password` keeps the
    /// current hash.
    async fn update_user_with_password(&self, user: &User, new_password: &str) -> Result<(), AppError>;
    async fn delete_user(&self, id: &str) -> Result<(), AppError>;
}
