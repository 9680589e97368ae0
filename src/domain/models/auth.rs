use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeSet;
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://pms.mirabilia.ng/claims/username")]
    pub username: String,

    #[serde(rename = "https://pms.mirabilia.ng/claims/authorities")]
    pub authorities: Vec<String>,

    #[serde(rename = "https://pms.mirabilia.ng/claims/csrf")]
    pub csrf_token: String,
}

#[derive(Debug, FromRow)]
pub struct RefreshTokenRecord {
    pub token_hash: String,
    pub user_id: String,
    pub family_id: Uuid,
    pub generation_id: i32,
    /// Shared by every generation of a family, so forms rendered before a
    /// rotation still verify after it.
    pub csrf_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub authorities: Vec<String>,
}

/// The authenticated actor behind a request.
///
/// Passed explicitly into the navigation policy and the page handlers;
/// nothing looks the principal up from ambient state.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
    pub authorities: BTreeSet<String>,
    pub csrf_token: String,
}

impl Principal {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    /// Checks the token an HTML form submitted against the session's.
    pub fn verify_csrf(&self, submitted: &str) -> Result<(), AppError> {
        if submitted.is_empty() || submitted != self.csrf_token {
            return Err(AppError::Forbidden("Invalid CSRF token".into()));
        }
        Ok(())
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            authorities: claims.authorities.into_iter().collect(),
            csrf_token: claims.csrf_token,
        }
    }
}
