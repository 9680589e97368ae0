//! Edit dialogs.
//!
//! An [`EditDialog`] owns a clone of the entity it edits plus a
//! [`FormDraft`] populated from it. Nothing is written back until `save`
//! passes validation, so abandoning a dialog leaves no trace. Persistence
//! is delegated to a [`DialogBackend`].

pub mod city_editor;
pub mod profile_editor;
pub mod property_editor;
pub mod user_editor;

use std::sync::Arc;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::models::notification::Notification;
use crate::error::AppError;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill out all required fields";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct InvalidField {
    pub field: &'static str,
    pub reason: String,
}

/// Column width of location names and codes.
pub const LOCATION_FIELD_MAX_CHARS: usize = 80;

/// Rejects `value` when, once trimmed, it holds more than `max` characters.
/// Counts characters, not bytes, to match `VARCHAR(n)` and SQLite `length`.
pub fn ensure_max_chars(field: &'static str, value: &str, max: usize) -> Result<(), InvalidField> {
    if value.trim().chars().count() > max {
        return Err(InvalidField { field, reason: format!("at most {} characters", max) });
    }
    Ok(())
}

/// Dialog-local copy of an entity's editable fields.
pub trait FormDraft: Clone + Send + Sync + 'static {
    type Entity: Clone + Send + Sync + 'static;

    /// Capitalised entity name used in notifications ("User").
    const LABEL: &'static str;

    /// Populates every field from `entity`; absent optional values become
    /// empty strings.
    fn from_entity(entity: &Self::Entity) -> Self;

    /// Names of required fields that are empty or unselected.
    fn missing_required(&self) -> Vec<&'static str>;

    /// Copies every field into `entity`.
    fn apply_to(&self, entity: &mut Self::Entity) -> Result<(), InvalidField>;
}

#[async_trait]
pub trait DialogBackend<D: FormDraft>: Send + Sync {
    async fn persist(&self, entity: &D::Entity, draft: &D) -> Result<(), AppError>;
    async fn remove(&self, entity: &D::Entity) -> Result<(), AppError>;
}

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("Please fill out all required fields")]
    MissingFields(Vec<&'static str>),
    #[error(transparent)]
    Invalid(#[from] InvalidField),
    #[error(transparent)]
    Persistence(AppError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Closed,
}

type Completion = Box<dyn FnOnce() + Send + Sync>;

pub struct EditDialog<D: FormDraft> {
    backend: Arc<dyn DialogBackend<D>>,
    entity: D::Entity,
    draft: D,
    state: DialogState,
    notifications: Vec<Notification>,
    on_success: Option<Completion>,
}

impl<D: FormDraft> EditDialog<D> {
    pub fn open<F>(backend: Arc<dyn DialogBackend<D>>, entity: &D::Entity, on_success: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            backend,
            entity: entity.clone(),
            draft: D::from_entity(entity),
            state: DialogState::Open,
            notifications: Vec::new(),
            on_success: Some(Box::new(on_success)),
        }
    }

    /// Replaces the draft with values the user entered.
    pub fn with_draft(mut self, draft: D) -> Self {
        self.draft = draft;
        self
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn entity(&self) -> &D::Entity {
        &self.entity
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub async fn save(&mut self) -> Result<(), DialogError> {
        let missing = self.draft.missing_required();
        if !missing.is_empty() {
            self.notifications.push(Notification::error(REQUIRED_FIELDS_MESSAGE));
            return Err(DialogError::MissingFields(missing));
        }

        let mut updated = self.entity.clone();
        if let Err(invalid) = self.draft.apply_to(&mut updated) {
            self.notifications.push(Notification::error(invalid.to_string()));
            return Err(DialogError::Invalid(invalid));
        }

        let result = self.backend.persist(&updated, &self.draft).await;
        match result {
            Ok(()) => {
                self.entity = updated;
                self.notifications
                    .push(Notification::success(format!("{} updated successfully", D::LABEL)));
                self.complete();
                Ok(())
            }
            Err(e) => {
                error!("{} update failed: {}", D::LABEL, e);
                self.notifications.push(Notification::error(format!(
                    "Unable to update {}: {}",
                    D::LABEL.to_lowercase(),
                    e
                )));
                Err(DialogError::Persistence(e))
            }
        }
    }

    pub async fn delete(&mut self) -> Result<(), DialogError> {
        let result = self.backend.remove(&self.entity).await;
        match result {
            Ok(()) => {
                self.complete();
                Ok(())
            }
            Err(e) => {
                error!("{} delete failed: {}", D::LABEL, e);
                self.notifications.push(Notification::error(format!(
                    "Unable to delete {}: {}",
                    D::LABEL.to_lowercase(),
                    e
                )));
                Err(DialogError::Persistence(e))
            }
        }
    }

    /// Closes without persisting. The completion callback is dropped
    /// uncalled.
    pub fn discard(&mut self) {
        self.state = DialogState::Closed;
        self.on_success = None;
    }

    fn complete(&mut self) {
        self.state = DialogState::Closed;
        if let Some(on_success) = self.on_success.take() {
            on_success();
        }
        info!("{} dialog completed", D::LABEL);
    }
}
