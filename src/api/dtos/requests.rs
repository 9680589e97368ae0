//! Form bodies posted by the back-office pages.
//!
//! Every field defaults to empty so that a partially filled form still
//! reaches the dialog, which reports what is missing.

use serde::Deserialize;

use crate::domain::dialogs::{
    city_editor::CityDraft, profile_editor::ProfileDraft, property_editor::PropertyDraft,
    user_editor::UserDraft,
};

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct CsrfForm {
    #[serde(default)]
    pub csrf_token: String,
}

/// Button pressed on an edit dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogAction {
    #[default]
    Save,
    Delete,
    Discard,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UserEditForm {
    pub csrf_token: String,
    pub action: DialogAction,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub house_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub role: String,
    pub password: String,
}

impl UserEditForm {
    pub fn into_draft(self) -> UserDraft {
        UserDraft {
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            email: self.email,
            username: self.username,
            phone_number: self.phone_number,
            house_number: self.house_number,
            street: self.street,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            role: self.role.parse().ok(),
            password: self.password,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateUserForm {
    pub csrf_token: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub phone_number: String,
    pub role: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ProfileForm {
    pub csrf_token: String,
    pub action: DialogAction,
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
    pub password: String,
}

impl ProfileForm {
    pub fn into_draft(self) -> ProfileDraft {
        ProfileDraft {
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            house_number: self.house_number,
            street: self.street,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            password: self.password,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreateStateForm {
    pub csrf_token: String,
    pub name: String,
    pub state_code: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CityForm {
    pub csrf_token: String,
    pub action: DialogAction,
    pub name: String,
    pub city_code: String,
    pub state_id: String,
}

impl CityForm {
    pub fn into_draft(self) -> CityDraft {
        CityDraft {
            name: self.name,
            city_code: self.city_code,
            state_id: self.state_id,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreatePhaseForm {
    pub csrf_token: String,
    pub name: String,
    pub city_id: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct PropertyForm {
    pub csrf_token: String,
    pub action: DialogAction,
    pub title: String,
    pub description: String,
    pub street: String,
    pub phase_id: String,
    pub property_type: String,
    pub status: String,
    pub price: String,
    pub agent_id: String,
}

impl PropertyForm {
    pub fn into_draft(self) -> PropertyDraft {
        PropertyDraft {
            title: self.title,
            description: self.description,
            street: self.street,
            phase_id: self.phase_id,
            property_type: self.property_type.parse().ok(),
            status: self.status.parse().ok(),
            price: self.price,
            agent_id: self.agent_id,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct CreatePropertyForm {
    pub csrf_token: String,
    pub title: String,
    pub phase_id: String,
    pub property_type: String,
    pub price: String,
}
