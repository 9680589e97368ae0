use serde::{Deserialize, Serialize};

/// Transient message shown to the user after an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub variant: NotificationVariant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Success,
    Error,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { message: message.into(), variant: NotificationVariant::Success }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), variant: NotificationVariant::Error }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NotificationVariant::Error
    }
}
