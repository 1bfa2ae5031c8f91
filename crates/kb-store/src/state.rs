//! Cached store state

use kb_core::traits::Id;
use kb_models::{BoardFull, Project};

/// One immutable snapshot of everything the store caches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub projects: Vec<Project>,
    pub project: Option<Project>,
    pub board: Option<BoardFull>,
}

impl StoreState {
    pub fn project_id(&self) -> Option<Id> {
        self.project.as_ref().map(|p| p.id)
    }

    pub fn board_id(&self) -> Option<Id> {
        self.board.as_ref().map(|b| b.board.id)
    }

    /// The cached project, when it is the one with `project_id`
    pub(crate) fn project_mut(&mut self, project_id: Id) -> Option<&mut Project> {
        self.project.as_mut().filter(|p| p.id == project_id)
    }

    /// The cached board, when it is the one with `board_id`
    pub(crate) fn board_mut(&mut self, board_id: Id) -> Option<&mut BoardFull> {
        self.board.as_mut().filter(|b| b.board.id == board_id)
    }
}
