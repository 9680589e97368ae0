use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Sale/lease lifecycle stage of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    /// Generic availability, any property type.
    Available,
    /// Land and building sales.
    Sold,
    /// Building sales paid over time.
    InInstallment,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 3] = [
        PropertyStatus::Available,
        PropertyStatus::Sold,
        PropertyStatus::InInstallment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "AVAILABLE",
            PropertyStatus::Sold => "SOLD",
            PropertyStatus::InInstallment => "IN_INSTALLMENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Land,
    Building,
}

impl PropertyType {
    pub const ALL: [PropertyType; 2] = [PropertyType::Land, PropertyType::Building];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Land => "LAND",
            PropertyType::Building => "BUILDING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown value: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for PropertyStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl FromStr for PropertyType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for PropertyStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PropertyType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub street: Option<String>,
    pub phase_id: String,
    #[sqlx(try_from = "String")]
    pub property_type: PropertyType,
    #[sqlx(try_from = "String")]
    pub status: PropertyStatus,
    pub price: i64,
    pub agent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn new(title: String, phase_id: String, property_type: PropertyType, price: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: None,
            street: None,
            phase_id,
            property_type,
            status: PropertyStatus::Available,
            price,
            agent_id: None,
            created_at: Utc::now(),
        }
    }
}
