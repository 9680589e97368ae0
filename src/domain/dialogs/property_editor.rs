use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::dialogs::{
    user_editor::{non_empty, or_empty},
    DialogBackend, FormDraft, InvalidField,
};
use crate::domain::models::property::{Property, PropertyStatus, PropertyType};
use crate::domain::ports::PropertyRepository;
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub street: String,
    pub phase_id: String,
    pub property_type: Option<PropertyType>,
    pub status: Option<PropertyStatus>,
    /// Entered as text, validated on save.
    pub price: String,
    pub agent_id: String,
}

impl FormDraft for PropertyDraft {
    type Entity = Property;

    const LABEL: &'static str = "Property";

    fn from_entity(property: &Property) -> Self {
        Self {
            title: property.title.clone(),
            description: or_empty(&property.description),
            street: or_empty(&property.street),
            phase_id: property.phase_id.clone(),
            property_type: Some(property.property_type),
            status: Some(property.status),
            price: property.price.to_string(),
            agent_id: or_empty(&property.agent_id),
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.is_empty() {
            missing.push("title");
        }
        if self.phase_id.is_empty() {
            missing.push("phase_id");
        }
        if self.property_type.is_none() {
            missing.push("property_type");
        }
        if self.status.is_none() {
            missing.push("status");
        }
        if self.price.is_empty() {
            missing.push("price");
        }
        missing
    }

    fn apply_to(&self, property: &mut Property) -> Result<(), InvalidField> {
        let price: i64 = self.price.trim().parse().map_err(|_| InvalidField {
            field: "price",
            reason: "must be a whole number".into(),
        })?;
        if price < 0 {
            return Err(InvalidField { field: "price", reason: "must not be negative".into() });
        }
        let property_type = self.property_type.ok_or(InvalidField {
            field: "property_type",
            reason: "a type must be selected".into(),
        })?;
        let status = self.status.ok_or(InvalidField {
            field: "status",
            reason: "a status must be selected".into(),
        })?;
        if status == PropertyStatus::InInstallment && property_type == PropertyType::Land {
            return Err(InvalidField {
                field: "status",
                reason: "installment sales apply to buildings only".into(),
            });
        }

        property.title = self.title.clone();
        property.description = non_empty(&self.description);
        property.street = non_empty(&self.street);
        property.phase_id = self.phase_id.clone();
        property.property_type = property_type;
        property.status = status;
        property.price = price;
        property.agent_id = non_empty(&self.agent_id);
        Ok(())
    }
}

pub struct PropertyEditor {
    repo: Arc<dyn PropertyRepository>,
}

impl PropertyEditor {
    pub fn new(repo: Arc<dyn PropertyRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl DialogBackend<PropertyDraft> for PropertyEditor {
    async fn persist(&self, property: &Property, _draft: &PropertyDraft) -> Result<(), AppError> {
        self.repo.update(property).await.map(|_| ())
    }

    async fn remove(&self, property: &Property) -> Result<(), AppError> {
        self.repo.delete(&property.id).await
    }
}
