use crate::domain::{models::property::Property, ports::PropertyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

const PROPERTY_COLUMNS: &str = "id, title, description, street, phase_id, property_type, status, price, agent_id, created_at";

pub struct SqlitePropertyRepo {
    pool: SqlitePool,
}

impl SqlitePropertyRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyRepository for SqlitePropertyRepo {
    async fn create(&self, property: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(&format!(
            "INSERT INTO properties ({PROPERTY_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {PROPERTY_COLUMNS}"
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
        sqlx::query_as::<_, Property>(&format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Property>, AppError> {
        sqlx::query_as::<_, Property>(&format!("SELECT {PROPERTY_COLUMNS} FROM properties ORDER BY created_at DESC"))
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, property: &Property) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(&format!(
            "UPDATE properties SET title = ?, description = ?, street = ?, phase_id = ?, property_type = ?, status = ?, price = ?, agent_id = ? WHERE id = ? RETURNING {PROPERTY_COLUMNS}"
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
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
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
