//! Stage model
//!
//! Endpoint: /projects/{id}/boards/{boardId}/stages

use kb_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A workflow column within a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "fake", derive(fake::Dummy))]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[cfg_attr(feature = "fake", dummy(faker = "1..1000000"))]
    pub id: Id,

    pub name: String,

    /// Position assigned by the server; never recomputed client-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl Identifiable for Stage {
    fn id(&self) -> Id {
        self.id
    }
}

impl Stage {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: None,
        }
    }
}

/// Payload for POST .../stages
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateStage {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl CreateStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Payload for PATCH .../stages/{stageId}/move
///
/// The moved stage ends up immediately after the leading stage. Without a leading
/// stage it becomes the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveStage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leading_stage_id: Option<Id>,
}

impl MoveStage {
    pub fn after(leading_stage_id: Option<Id>) -> Self {
        Self { leading_stage_id }
    }
}
