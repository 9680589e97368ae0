use crate::domain::{models::property::Property, ports::PropertyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

const PROPERTY_COLUMNS: &str = "id, title, description, street, phase_id, property_type, status, price, agent_id, created_at";

pub struct PostgresPropertyRepo {
    pool: PgPool,
}

impl PostgresPropertyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyRepository for PostgresPropertyRepo {
    async fn create(&self, property: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(&format!(
            "INSERT INTO properties ({PROPERTY_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {PROPERTY_COLUMNS}"
        ))
            .bind(&property.id)
            .bind(&property.title)
            .bind(&property.description)
            .bind(&property.street)
            .bind(&property.phase_id)
            .bind(property.property_type.as_str())
            .bind(property.status.as_str())
            .bind(property.price)
            .bind(&property.agent_id)
            .bind(property.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError> {
        sqlx::query_as::<_, Property>(&format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Property>, AppError> {
        sqlx::query_as::<_, Property>(&format!("SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY created_at DESC"))
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, property: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(&format!(
            "UPDATE properties SET title = $1, description = $2, street = $3, phase_id = $4, property_type = $5, status = $6, price = $7, agent_id = $8 WHERE id = $9 RETURNING {PROPERTY_COLUMNS}"
        ))
            .bind(&property.title)
            .bind(&property.description)
            .bind(&property.street)
            .bind(&property.phase_id)
            .bind(property.property_type.as_str())
            .bind(property.status.as_str())
            .bind(property.price)
            .bind(&property.agent_id)
            .bind(&property.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_db)?
            .ok_or(AppError::NotFound("Property not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_db_delete)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Property not found".into()));
        }
        Ok(())
    }
}
