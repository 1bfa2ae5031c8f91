//! Project model
//!
//! Endpoint: /projects

use kb_core::diff::modified_fields;
use kb_core::error::KbError;
use kb_core::result::KbResult;
use kb_core::traits::{find_by_id, Id, Identifiable};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::board::Board;
use crate::project_user::ProjectUser;

/// Project entity
///
/// Top-level container owning boards and user memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fake", derive(fake::Dummy))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[cfg_attr(feature = "fake", dummy(faker = "1..1000000"))]
    pub id: Id,

    pub name: String,

    pub description: Option<String>,

    /// Board summaries, in server order
    #[serde(default)]
    pub boards: Vec<Board>,

    /// Memberships (user + role)
    #[serde(default)]
    pub users: Vec<ProjectUser>,
}

impl Identifiable for Project {
    fn id(&self) -> Id {
        self.id
    }
}

impl Project {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            boards: Vec::new(),
            users: Vec::new(),
        }
    }

    /// The board flagged as default, if any
    pub fn default_board(&self) -> Option<&Board> {
        self.boards.iter().find(|b| b.is_default)
    }

    pub fn board(&self, board_id: Id) -> Option<&Board> {
        find_by_id(&self.boards, board_id)
    }

    pub fn member(&self, username: &str) -> Option<&ProjectUser> {
        self.users.iter().find(|u| u.user.username == username)
    }

    /// Merge a project returned by an update into this one.
    ///
    /// Scalar fields are always taken from `updated`. Update responses usually omit the
    /// board and member collections, so those are only replaced when present.
    pub fn merge_from(&mut self, updated: Project) {
        self.id = updated.id;
        self.name = updated.name;
        self.description = updated.description;
        if !updated.boards.is_empty() {
            self.boards = updated.boards;
        }
        if !updated.users.is_empty() {
            self.users = updated.users;
        }
    }
}

/// Editable fields of a project, as shown in a settings form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetails {
    pub name: String,
    pub description: Option<String>,
}

impl From<&Project> for ProjectDetails {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
        }
    }
}

/// Payload for POST /projects
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Payload for PATCH /projects/{id}
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
}

impl UpdateProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Build a patch holding only what changed between two versions of the details
    pub fn between(original: &ProjectDetails, modified: &ProjectDetails) -> KbResult<Self> {
        let diff = modified_fields(original, modified)?;
        serde_json::from_value(serde_json::Value::Object(diff))
            .map_err(|e| KbError::Internal(format!("invalid project patch: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Distinguishes an explicit `null` from an absent key
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
