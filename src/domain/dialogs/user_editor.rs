use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::dialogs::{DialogBackend, FormDraft, InvalidField};
use crate::domain::models::{role::{Role, RoleSet}, user::User};
use crate::domain::ports::UserDirectory;
use crate::error::AppError;

/// Draft behind the user editor. The role control is single-selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserDraft {
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
    pub role: Option<Role>,
    #[serde(skip_serializing)]
    pub password: String,
}

pub(crate) fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl FormDraft for UserDraft {
    type Entity = User;

    const LABEL: &'static str = "User";

    fn from_entity(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            middle_name: or_empty(&user.middle_name),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            phone_number: or_empty(&user.phone_number),
            house_number: or_empty(&user.house_number),
            street: or_empty(&user.street),
            city: or_empty(&user.city),
            state: or_empty(&user.state),
            postal_code: or_empty(&user.postal_code),
            role: Some(user.roles.first()),
            password: String::new(),
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.first_name.is_empty() {
            missing.push("first_name");
        }
        if self.last_name.is_empty() {
            missing.push("last_name");
        }
        if self.email.is_empty() {
            missing.push("email");
        }
        if self.username.is_empty() {
            missing.push("username");
        }
        if self.role.is_none() {
            missing.push("role");
        }
        if self.phone_number.is_empty() {
            missing.push("phone_number");
        }
        missing
    }

    fn apply_to(&self, user: &mut User) -> Result<(), InvalidField> {
        let role = self.role.ok_or_else(|| InvalidField {
            field: "role",
            reason: "a role must be selected".into(),
        })?;

        user.first_name = self.first_name.clone();
        user.middle_name = non_empty(&self.middle_name);
        user.last_name = self.last_name.clone();
        user.email = self.email.clone();
        user.username = self.username.clone();
        user.phone_number = non_empty(&self.phone_number);
        user.street = non_empty(&self.street);
        user.city = non_empty(&self.city);
        user.state = non_empty(&self.state);
        user.postal_code = non_empty(&self.postal_code);
        user.house_number = non_empty(&self.house_number);
        user.roles = RoleSet::single(role);
        Ok(())
    }
}

/// Routes the user editor's persistence through the directory. The draft
/// password is forwarded as entered, empty included.
pub struct UserEditor {
    directory: Arc<dyn UserDirectory>,
    acting_user_id: Option<String>,
}

impl UserEditor {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory, acting_user_id: None }
    }

    /// Refuses deletion of the account `user_id` is signed in as.
    pub fn acting_as(mut self, user_id: impl Into<String>) -> Self {
        self.acting_user_id = Some(user_id.into());
        self
    }
}

#[async_trait]
impl DialogBackend<UserDraft> for UserEditor {
    async fn persist(&self, user: &User, draft: &UserDraft) -> Result<(), AppError> {
        self.directory.update_user_with_password(user, &draft.password).await
    }

    async fn remove(&self, user: &User) -> Result<(), AppError> {
        if self.acting_user_id.as_deref() == Some(user.id.as_str()) {
            return Err(AppError::Conflict("Cannot delete yourself".into()));
        }
        self.directory.delete_user(&user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogs::{DialogError, DialogState, EditDialog};
    use crate::domain::models::notification::NotificationVariant;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockDirectory {
        updates: Mutex<Vec<(User, String)>>,
        deletes: Mutex<Vec<String>>,
        fail_update: Option<String>,
        fail_delete: Option<String>,
    }

    #[async_trait]
    impl UserDirectory for MockDirectory {
        async fn find_by_username(&self, _username: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }

        async fn list_users(&self) -> Result<Vec<User>, AppError> {
            Ok(Vec::new())
        }

        async fn create_user(&self, user: User, _password: &str) -> Result<User, AppError> {
            Ok(user)
        }

        async fn update_user_with_password(&self, user: &User, new_password: &str) -> Result<(), AppError> {
            if let Some(msg) = &self.fail_update {
                return Err(AppError::Conflict(msg.clone()));
            }
            self.updates.lock().unwrap().push((user.clone(), new_password.to_string()));
            Ok(())
        }

        async fn delete_user(&self, id: &str) -> Result<(), AppError> {
            if let Some(msg) = &self.fail_delete {
                return Err(AppError::Conflict(msg.clone()));
            }
            self.deletes.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    fn sample_user() -> User {
        let mut user = User::new(
            "Ada".into(),
            "Obi".into(),
            "ada@example.com".into(),
            "ada".into(),
            Role::Agent,
            "$argon2id$stub".into(),
        );
        user.phone_number = Some("08030000000".into());
        user.city = Some("Abuja".into());
        user
    }

    fn open_dialog(directory: Arc<MockDirectory>, user: &User) -> (EditDialog<UserDraft>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let dialog = EditDialog::open(Arc::new(UserEditor::new(directory)), user, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (dialog, calls)
    }

    #[test]
    fn test_open_populates_absent_fields_with_empty_string() {
        let user = sample_user();
        let draft = UserDraft::from_entity(&user);
        assert_eq!(draft.middle_name, "");
        assert_eq!(draft.street, "");
        assert_eq!(draft.city, "Abuja");
        assert_eq!(draft.role, Some(Role::Agent));
        assert_eq!(draft.password, "");
        assert!(!format!("{:?}", draft).contains("null"));
    }

    #[tokio::test]
    async fn test_save_with_missing_first_name_keeps_dialog_open() {
        let directory = Arc::new(MockDirectory::default());
        let user = sample_user();
        let (mut dialog, calls) = open_dialog(directory.clone(), &user);
        dialog.draft_mut().first_name.clear();
        dialog.draft_mut().street = "Main Street".into();

        let result = dialog.save().await;

        assert!(matches!(result, Err(DialogError::MissingFields(ref f)) if f == &vec!["first_name"]));
        assert_eq!(dialog.state(), DialogState::Open);
        assert_eq!(dialog.draft().street, "Main Street");
        assert_eq!(dialog.entity(), &user);
        assert!(directory.updates.lock().unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(dialog.notifications()[0].variant, NotificationVariant::Error);
    }

    #[tokio::test]
    async fn test_save_without_role_is_rejected() {
        let directory = Arc::new(MockDirectory::default());
        let (mut dialog, _) = open_dialog(directory.clone(), &sample_user());
        dialog.draft_mut().role = None;
        dialog.draft_mut().phone_number.clear();

        match dialog.save().await {
            Err(DialogError::MissingFields(fields)) => assert_eq!(fields, vec!["role", "phone_number"]),
            other => panic!("expected missing fields, got {:?}", other),
        }
        assert!(dialog.is_open());
        assert!(directory.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_merges_draft_and_completes_once() {
        let directory = Arc::new(MockDirectory::default());
        let user = sample_user();
        let (mut dialog, calls) = open_dialog(directory.clone(), &user);
        {
            let draft = dialog.draft_mut();
            draft.middle_name = "Grace".into();
            draft.city = String::new();
            draft.role = Some(Role::Manager);
            draft.password = "n3w-secret".into();
        }

        dialog.save().await.unwrap();

        let updates = directory.updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        let (saved, password) = &updates[0];
        assert_eq!(saved.id, user.id);
        assert_eq!(saved.middle_name.as_deref(), Some("Grace"));
        assert_eq!(saved.city, None);
        assert_eq!(saved.roles, RoleSet::single(Role::Manager));
        assert_eq!(password, "n3w-secret");

        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(dialog.notifications()[0].message, "User updated successfully");
    }

    #[tokio::test]
    async fn test_empty_password_is_forwarded() {
        let directory = Arc::new(MockDirectory::default());
        let (mut dialog, _) = open_dialog(directory.clone(), &sample_user());

        dialog.save().await.unwrap();

        assert_eq!(directory.updates.lock().unwrap()[0].1, "");
    }

    #[tokio::test]
    async fn test_save_failure_surfaces_message_and_stays_open() {
        let directory = Arc::new(MockDirectory {
            fail_update: Some("Username already exists".into()),
            ..Default::default()
        });
        let (mut dialog, calls) = open_dialog(directory, &sample_user());

        let result = dialog.save().await;

        assert!(matches!(result, Err(DialogError::Persistence(_))));
        assert!(dialog.is_open());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            dialog.notifications()[0].message,
            "Unable to update user: Username already exists"
        );
    }

    #[tokio::test]
    async fn test_delete_success_closes_and_completes() {
        let directory = Arc::new(MockDirectory::default());
        let user = sample_user();
        let (mut dialog, calls) = open_dialog(directory.clone(), &user);

        dialog.delete().await.unwrap();

        assert_eq!(*directory.deletes.lock().unwrap(), vec![user.id.clone()]);
        assert!(!dialog.is_open());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rejected_delete_keeps_dialog_open() {
        let directory = Arc::new(MockDirectory {
            fail_delete: Some("Record is still referenced by other records".into()),
            ..Default::default()
        });
        let (mut dialog, calls) = open_dialog(directory, &sample_user());

        assert!(dialog.delete().await.is_err());

        assert!(dialog.is_open());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let note = &dialog.notifications()[0];
        assert!(note.is_error());
        assert!(note.message.contains("Record is still referenced by other records"));
    }

    #[tokio::test]
    async fn test_discard_closes_without_callback() {
        let directory = Arc::new(MockDirectory::default());
        let (mut dialog, calls) = open_dialog(directory.clone(), &sample_user());
        dialog.draft_mut().first_name = "Changed".into();

        dialog.discard();

        assert_eq!(dialog.state(), DialogState::Closed);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(directory.updates.lock().unwrap().is_empty());
        assert_eq!(dialog.entity().first_name, "Ada");
    }

    #[tokio::test]
    async fn test_cannot_delete_own_account() {
        let directory = Arc::new(MockDirectory::default());
        let user = sample_user();
        let editor = UserEditor::new(directory.clone()).acting_as(user.id.clone());
        let mut dialog = EditDialog::open(Arc::new(editor), &user, || {});

        assert!(dialog.delete().await.is_err());

        assert!(dialog.is_open());
        assert!(directory.deletes.lock().unwrap().is_empty());
        assert_eq!(dialog.notifications()[0].message, "Unable to delete user: Cannot delete yourself");
    }
}
