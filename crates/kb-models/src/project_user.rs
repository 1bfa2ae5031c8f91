//! Project membership model
//!
//! Endpoint: /projects/{id}/users

use kb_core::traits::Id;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User reference carried by a membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fake", derive(fake::Dummy))]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,

    #[cfg_attr(feature = "fake", dummy(faker = "fake::faker::internet::en::Username()"))]
    pub username: String,
}

/// Role reference carried by a membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "fake", derive(fake::Dummy))]
pub struct Role {
    pub name: String,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A user's membership in one project, with its assigned role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fake", derive(fake::Dummy))]
pub struct ProjectUser {
    pub user: User,
    pub role: Role,
}

impl ProjectUser {
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user: User {
                id: None,
                username: username.into(),
            },
            role: Role::new(role),
        }
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

/// Payload for PUT /projects/{id}/users
#[derive(Debug, Clone, Serialize, Validate)]
pub struct AddProjectUser {
    #[validate(length(min = 1))]
    pub username: String,
}

/// Payload for PATCH /projects/{id}/users/{username}
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProjectUserRole {
    #[validate(length(min = 1))]
    pub role_name: String,
}
