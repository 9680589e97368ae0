use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::dialogs::{
    ensure_max_chars, DialogBackend, FormDraft, InvalidField, LOCATION_FIELD_MAX_CHARS,
};
use crate::domain::models::location::City;
use crate::domain::ports::LocationRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityDraft {
    pub name: String,
    pub city_code: String,
    pub state_id: String,
}

impl FormDraft for CityDraft {
    type Entity = City;

    const LABEL: &'static str = "City";

    fn from_entity(city: &City) -> Self {
        Self {
            name: city.name.clone(),
            city_code: city.city_code.clone(),
            state_id: city.state_id.clone(),
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("city_code", &self.city_code),
            ("state_id", &self.state_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn apply_to(&self, city: &mut City) -> Result<(), InvalidField> {
        ensure_max_chars("name", &self.name, LOCATION_FIELD_MAX_CHARS)?;
        ensure_max_chars("city_code", &self.city_code, LOCATION_FIELD_MAX_CHARS)?;
        city.name = self.name.trim().to_string();
        city.city_code = self.city_code.trim().to_string();
        city.state_id = self.state_id.clone();
        Ok(())
    }
}

pub struct CityEditor {
    repo: Arc<dyn LocationRepository>,
}

impl CityEditor {
    pub fn new(repo: Arc<dyn LocationRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl DialogBackend<CityDraft> for CityEditor {
    async fn persist(&self, city: &City, _draft: &CityDraft) -> Result<(), AppError> {
        self.repo.update_city(city).await.map(|_| ())
    }

    async fn remove(&self, city: &City) -> Result<(), AppError> {
        self.repo.delete_city(&city.id).await
    }
}
