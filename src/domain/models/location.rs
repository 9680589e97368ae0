use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct State {
    pub id: String,
    pub name: String,
    pub state_code: String,
}

impl State {
    pub fn new(name: String, state_code: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            state_code,
        }
    }
}

/// A city inside a [`State`]. `name` and `city_code` are unique across all
/// cities.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct City {
    pub id: String,
    pub name: String,
    pub city_code: String,
    pub state_id: String,
}

impl City {
    pub fn new(name: String, city_code: String, state_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            city_code,
            state_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub city_id: String,
}

impl Phase {
    pub fn new(name: String, city_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            city_id,
        }
    }
}
