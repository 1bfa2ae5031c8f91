//! Board models
//!
//! Endpoint: /projects/{id}/boards

use kb_core::diff::modified_fields;
use kb_core::error::KbError;
use kb_core::result::KbResult;
use kb_core::traits::{find_by_id, Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::stage::Stage;

/// Board summary, as listed on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fake", derive(fake::Dummy))]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[cfg_attr(feature = "fake", dummy(faker = "1..1000000"))]
    pub id: Id,

    pub name: String,

    /// At most one board per project carries this flag
    #[serde(default)]
    #[cfg_attr(feature = "fake", dummy(expr = "false"))]
    pub is_default: bool,
}

impl Identifiable for Board {
    fn id(&self) -> Id {
        self.id
    }
}

impl Board {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Overwrite this summary with the fields of an updated board
    pub fn merge_from(&mut self, updated: &Board) {
        self.id = updated.id;
        self.name = updated.name.clone();
        self.is_default = updated.is_default;
    }
}

/// A board together with its ordered stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardFull {
    #[serde(flatten)]
    pub board: Board,

    /// Workflow columns in server order
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Identifiable for BoardFull {
    fn id(&self) -> Id {
        self.board.id
    }
}

impl BoardFull {
    pub fn new(board: Board, stages: Vec<Stage>) -> Self {
        Self { board, stages }
    }

    pub fn stage(&self, stage_id: Id) -> Option<&Stage> {
        find_by_id(&self.stages, stage_id)
    }

    /// Remove a stage by id, returning whether one was removed
    pub fn remove_stage(&mut self, stage_id: Id) -> bool {
        let before = self.stages.len();
        self.stages.retain(|s| s.id != stage_id);
        self.stages.len() != before
    }
}

/// Editable fields of a board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardDetails {
    pub name: String,
}

impl From<&Board> for BoardDetails {
    fn from(board: &Board) -> Self {
        Self {
            name: board.name.clone(),
        }
    }
}

/// Payload for POST /projects/{id}/boards
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateBoard {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl CreateBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Payload for PATCH /projects/{id}/boards/{boardId}
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpdateBoard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

impl UpdateBoard {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn between(original: &BoardDetails, modified: &BoardDetails) -> KbResult<Self> {
        let diff = modified_fields(original, modified)?;
        serde_json::from_value(serde_json::Value::Object(diff))
            .map_err(|e| KbError::Internal(format!("invalid board patch: {}", e)))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}
