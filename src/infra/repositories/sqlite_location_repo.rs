use crate::domain::{
    models::location::{City, Phase, State},
    ports::LocationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteLocationRepo {
    pool: SqlitePool,
}

impl SqliteLocationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for SqliteLocationRepo {
    async fn create_state(&self, state: &State) -> Result<State, AppError> {
        sqlx::query_as::<_, State>(
            "INSERT INTO states (id, name, state_code) VALUES (?, ?, ?) RETURNING id, name, state_code"
        )
            .bind(&state.id)
            .bind(&state.name)
            .bind(&state.state_code)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    async fn list_states(&self) -> Result<Vec<State>, AppError> {
        sqlx::query_as::<_, State>("SELECT id, name, state_code FROM states ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_city(&self, city: &City) -> Result<City, AppError> {
        sqlx::query_as::<_, City>(
            "INSERT INTO cities (id, name, city_code, state_id) VALUES (?, ?, ?, ?) RETURNING id, name, city_code, state_id"
        )
            .bind(&city.id)
            .bind(&city.name)
            .bind(&city.city_code)
            .bind(&city.state_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    async fn find_city(&self, id: &str) -> Result<Option<City>, AppError> {
        sqlx::query_as::<_, City>("SELECT id, name, city_code, state_id FROM cities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_cities(&self) -> Result<Vec<City>, AppError> {
        sqlx::query_as::<_, City>("SELECT id, name, city_code, state_id FROM cities ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_city(&self, city: &City) -> Result<City, AppError> {
        sqlx::query_as::<_, City>(
            "UPDATE cities SET name = ?, city_code = ?, state_id = ? WHERE id = ? RETURNING id, name, city_code, state_id"
        )
            .bind(&city.name)
            .bind(&city.city_code)
            .bind(&city.state_id)
            .bind(&city.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from_db)?
            .ok_or(AppError::NotFound("City not found".into()))
    }

    async fn delete_city(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from_db_delete)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("City not found".into()));
        }
        Ok(())
    }

    async fn create_phase(&self, phase: &Phase) -> Result<Phase, AppError> {
        sqlx::query_as::<_, Phase>(
            "INSERT INTO phases (id, name, city_id) VALUES (?, ?, ?) RETURNING id, name, city_id"
        )
            .bind(&phase.id)
            .bind(&phase.name)
            .bind(&phase.city_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from_db)
    }

    async fn list_phases(&self) -> Result<Vec<Phase>, AppError> {
        sqlx::query_as::<_, Phase>("SELECT id, name, city_id FROM phases ORDER BY name ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
