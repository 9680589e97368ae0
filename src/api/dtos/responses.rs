use serde::Serialize;

use crate::domain::models::location::{City, Phase};
use crate::domain::models::property::{Property, PropertyStatus};

#[derive(Serialize)]
pub struct CityRow {
    pub city: City,
    pub state_name: String,
}

#[derive(Serialize)]
pub struct PhaseRow {
    pub phase: Phase,
    pub city_name: String,
}

#[derive(Serialize)]
pub struct AgentOption {
    pub id: String,
    pub username: String,
}

#[derive(Serialize, Default, Debug, PartialEq, Eq)]
pub struct PropertyStats {
    pub total: usize,
    pub available: usize,
    pub sold: usize,
    pub in_installment: usize,
}

impl PropertyStats {
    pub fn tally(properties: &[Property]) -> Self {
        let count = |status: PropertyStatus| properties.iter().filter(|p| p.status == status).count();
        Self {
            total: properties.len(),
            available: count(PropertyStatus::Available),
            sold: count(PropertyStatus::Sold),
            in_installment: count(PropertyStatus::InInstallment),
        }
    }
}
