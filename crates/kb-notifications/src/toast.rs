//! Toast messages

use chrono::{DateTime, Utc};
use kb_core::KbError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

impl From<&KbError> for Toast {
    fn from(error: &KbError) -> Self {
        Self::error(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_from_error() {
        let toast = Toast::from(&KbError::NotFound {
            message: "Project 4".into(),
        });
        assert!(toast.is_error());
        assert!(toast.message.contains("Project 4"));
    }

    #[test]
    fn test_toast_serialization() {
        let toast = Toast::warning("Board has no stages");
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "Board has no stages");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_toast_ids_are_unique() {
        assert_ne!(Toast::info("a").id, Toast::info("a").id);
    }
}
