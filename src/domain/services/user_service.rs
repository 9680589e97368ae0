use std::sync::Arc;
use async_trait::async_trait;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use tracing::{error, info, warn};

use crate::domain::models::{role::Role, user::User};
use crate::domain::ports::{UserDirectory, UserRepository};
use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::InternalWithMsg(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|_| AppError::Internal)?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed_hash).is_ok())
}

/// [`UserDirectory`] backed by a [`UserRepository`].
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Creates the first administrator when the users table is empty and
    /// returns the generated password. Returns `None` when users exist.
    pub async fn ensure_bootstrap_admin(&self, username: &str) -> Result<Option<String>, AppError> {
        if self.repo.count().await? > 0 {
            return Ok(None);
        }

        let password: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        let mut admin = User::new(
            "System".to_string(),
            "Administrator".to_string(),
            format!("{}@localhost", username),
            username.to_string(),
            Role::Admin,
            String::new(),
        );
        admin.phone_number = Some("0".to_string());
        self.create_user(admin, &password).await?;

        warn!("Bootstrap administrator '{}' created with password: {}", username, password);
        Ok(Some(password))
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.repo.find_by_username(username).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.repo.find_by_id(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    async fn create_user(&self, mut user: User, password: &str) -> Result<User, AppError> {
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }
        if self.repo.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists".into()));
        }

        user.password_hash = hash_password(password)?;
        let created = self.repo.create(&user).await?;
        info!("Created user: {} ({})", created.username, created.id);
        Ok(created)
    }

    async fn update_user_with_password(&self, user: &User, new_password: &str) -> Result<(), AppError> {
        let current = self.repo.find_by_id(&user.id).await?
            .ok_or(AppError::NotFound("User not found".into()))?;

        if current.username != user.username {
            if let Some(other) = self.repo.find_by_username(&user.username).await? {
                if other.id != user.id {
                    return Err(AppError::Conflict("Username already exists".into()));
                }
            }
        }

        let mut updated = user.clone();
        updated.password_hash = if new_password.is_empty() {
            current.password_hash
        } else {
            hash_password(new_password)?
        };

        self.repo.update(&updated).await?;
        info!("Updated user: {}", updated.id);
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        match self.repo.delete(id).await {
            Ok(_) => {
                info!("Deleted user {}", id);
                Ok(())
            }
            Err(e) => {
                error!("Failed to delete user {}: {:?}", id, e);
                Err(e)
            }
        }
    }
}
