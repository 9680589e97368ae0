use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation
fn is_unique_violation(code: &str) -> bool {
    matches!(code, "2067" | "23505")
}

// 787 = SQLite foreign key constraint, 23503 = PostgreSQL foreign key violation
fn is_foreign_key_violation(code: &str) -> bool {
    matches!(code, "787" | "23503")
}

impl AppError {
    /// Maps constraint violations of an insert or update to `Conflict` with
    /// a readable message. A foreign-key failure here means the referenced
    /// parent is gone. Everything else stays a `Database` error.
    pub fn from_db(e: sqlx::Error) -> Self {
        Self::constraint_conflict(e, "Referenced record does not exist")
    }

    /// Like [`AppError::from_db`], for deletes, where a foreign-key failure
    /// means other rows still point at the record.
    pub fn from_db_delete(e: sqlx::Error) -> Self {
        Self::constraint_conflict(e, "Record is still referenced by other records")
    }

    fn constraint_conflict(e: sqlx::Error, foreign_key_message: &str) -> Self {
        if let Some(db_err) = e.as_database_error() {
            let code = db_err.code().unwrap_or_default();
            if is_unique_violation(&code) {
                return AppError::Conflict("Resource already exists (duplicate entry)".into());
            }
            if is_foreign_key_violation(&code) {
                return AppError::Conflict(foreign_key_message.into());
            }
        }
        AppError::Database(e)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(e) => match e.as_database_error().and_then(|d| d.code()) {
                Some(code) if is_unique_violation(&code) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal | AppError::InternalWithMsg(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();
                    if is_unique_violation(&code) {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
