//! # kb-models
//!
//! Domain models for the kanban client.
//!
//! These structs mirror the JSON the tracker's REST API exchanges. Field names are
//! camelCase on the wire.

pub use kb_core::traits::{Id, Identifiable};

pub mod project;
pub mod board;
pub mod stage;
pub mod project_user;

pub use project::{CreateProject, Project, ProjectDetails, UpdateProject};
pub use board::{Board, BoardDetails, BoardFull, CreateBoard, UpdateBoard};
pub use stage::{CreateStage, MoveStage, Stage};
pub use project_user::{AddProjectUser, ChangeProjectUserRole, ProjectUser, Role, User};
