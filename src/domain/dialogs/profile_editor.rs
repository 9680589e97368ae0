use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::dialogs::{
    user_editor::{non_empty, or_empty},
    DialogBackend, FormDraft, InvalidField,
};
use crate::domain::models::user::User;
use crate::domain::ports::UserDirectory;
use crate::error::AppError;

/// Self-service profile: everything on the user editor except username and
/// roles, which only an administrator may change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileDraft {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub house_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl FormDraft for ProfileDraft {
    type Entity = User;

    const LABEL: &'static str = "Profile";

    fn from_entity(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            middle_name: or_empty(&user.middle_name),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone_number: or_empty(&user.phone_number),
            house_number: or_empty(&user.house_number),
            street: or_empty(&user.street),
            city: or_empty(&user.city),
            state: or_empty(&user.state),
            postal_code: or_empty(&user.postal_code),
            password: String::new(),
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn apply_to(&self, user: &mut User) -> Result<(), InvalidField> {
        user.first_name = self.first_name.clone();
        user.middle_name = non_empty(&self.middle_name);
        user.last_name = self.last_name.clone();
        user.email = self.email.clone();
        user.phone_number = non_empty(&self.phone_number);
        user.street = non_empty(&self.street);
        user.city = non_empty(&self.city);
        user.state = non_empty(&self.state);
        user.postal_code = non_empty(&self.postal_code);
        user.house_number = non_empty(&self.house_number);
        Ok(())
    }
}

pub struct ProfileEditor {
    directory: Arc<dyn UserDirectory>,
}

impl ProfileEditor {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl DialogBackend<ProfileDraft> for ProfileEditor {
    async fn persist(&self, user: &User, draft: &ProfileDraft) -> Result<(), AppError> {
        self.directory.update_user_with_password(user, &draft.password).await
    }

    async fn remove(&self, _user: &User) -> Result<(), AppError> {
        Err(AppError::Forbidden("Profiles cannot delete their own account".into()))
    }
}
