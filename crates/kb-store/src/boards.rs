//! Board and stage actions

use kb_core::{find_by_id_mut, ActionOutcome, Id, Precondition};
use kb_models::{Board, BoardFull, CreateBoard, CreateStage, MoveStage, Stage, UpdateBoard};
use kb_router::{NavigationTarget, BOARD_QUERY};

use crate::sequencer::Resource;
use crate::store::ProjectsStore;

impl ProjectsStore {
    /// Load a board of the cached project.
    ///
    /// Without an id the project's default board is loaded. With an id, the current
    /// route's `board` query parameter is set to it first.
    pub async fn load_board(&self, board_id: Option<Id>) -> ActionOutcome<BoardFull> {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };

        let board_id = match board_id {
            Some(board_id) => {
                let mut query = self.navigator().current().location.query;
                query.insert(BOARD_QUERY.to_string(), board_id.to_string());
                self.navigate(NavigationTarget::query(query));
                board_id
            }
            None => match project.default_board() {
                Some(board) => board.id,
                None => {
                    tracing::debug!(project_id = project.id, "project has no default board");
                    return Precondition::NoDefaultBoard.into();
                }
            },
        };

        let ticket = self.sequencer.issue_for(Resource::Board, board_id);
        let result = self.api.get_board(project.id, board_id).await;

        if !self.sequencer.is_current(ticket) {
            return Self::superseded("load_board", ticket);
        }
        match result {
            Ok(board) => {
                let applied = self.apply_if_current(ticket, |state| {
                    state.board = Some(board.clone());
                });
                if !applied {
                    return Self::superseded("load_board", ticket);
                }
                tracing::debug!(board_id, stages = board.stages.len(), "loaded board");
                ActionOutcome::Done(board)
            }
            Err(error) => self.fail_load("load_board", error),
        }
    }

    /// Create a board in the cached project and make it the current board
    pub async fn create_board(&self, input: CreateBoard) -> ActionOutcome<Board> {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };
        if let Err(error) = Self::validate(&input) {
            return self.fail("create_board", error);
        }

        let board = match self.api.create_board(project.id, &input).await {
            Ok(board) => board,
            Err(error) => return self.fail("create_board", error),
        };

        self.mutate(|state| match state.project_mut(project.id) {
            Some(cached) => {
                cached.boards.push(board.clone());
                true
            }
            None => false,
        });
        tracing::info!(project_id = project.id, board_id = board.id, "created board");

        // A failed load has already been reported
        let loaded = self.load_board(Some(board.id)).await;
        if !loaded.is_done() {
            tracing::debug!(board_id = board.id, "new board was not loaded");
        }

        ActionOutcome::Done(board)
    }

    /// Patch the cached board, keeping the project's board list in step
    pub async fn update_board(&self, input: UpdateBoard) -> ActionOutcome<Board> {
        let (project_id, board) = match self.require_board() {
            Ok(found) => found,
            Err(precondition) => return precondition.into(),
        };
        if let Err(error) = Self::validate(&input) {
            return self.fail("update_board", error);
        }

        let board_id = board.board.id;
        let updated = match self.api.update_board(project_id, board_id, &input).await {
            Ok(updated) => updated,
            Err(error) => return self.fail("update_board", error),
        };

        self.mutate(|state| {
            let mut changed = false;
            if let Some(entry) = state
                .project_mut(project_id)
                .and_then(|p| find_by_id_mut(&mut p.boards, board_id))
            {
                entry.merge_from(&updated);
                changed = true;
            }
            if let Some(cached) = state.board_mut(board_id) {
                cached.board.merge_from(&updated);
                changed = true;
            }
            changed
        });

        ActionOutcome::Done(updated)
    }

    /// Delete a board of the cached project, then load the default board
    pub async fn delete_board(&self, board_id: Id) -> ActionOutcome {
        let project = match self.require_project() {
            Ok(project) => project,
            Err(precondition) => return precondition.into(),
        };

        if let Err(error) = self.api.delete_board(project.id, board_id).await {
            return self.fail("delete_board", error);
        }

        if self.snapshot().board_id() == Some(board_id) {
            self.sequencer.invalidate(Resource::Board);
        } else {
            self.sequencer.invalidate_target(Resource::Board, board_id);
        }
        self.mutate(|state| {
            let mut changed = false;
            if let Some(cached) = state.project_mut(project.id) {
                let before = cached.boards.len();
                cached.boards.retain(|b| b.id != board_id);
                changed = cached.boards.len() != before;
            }
            if state.board_id() == Some(board_id) {
                state.board = None;
                changed = true;
            }
            changed
        });
        tracing::info!(project_id = project.id, board_id, "deleted board");

        if let ActionOutcome::Skipped(precondition) = self.load_board(None).await {
            tracing::debug!(%precondition, "no board to show after delete");
        }

        ActionOutcome::Done(())
    }

    /// Add a stage to the end of the cached board
    pub async fn create_stage(&self, input: CreateStage) -> ActionOutcome<Stage> {
        let (project_id, board) = match self.require_board() {
            Ok(found) => found,
            Err(precondition) => return precondition.into(),
        };
        if let Err(error) = Self::validate(&input) {
            return self.fail("create_stage", error);
        }

        let board_id = board.board.id;
        let stage = match self.api.create_stage(project_id, board_id, &input).await {
            Ok(stage) => stage,
            Err(error) => return self.fail("create_stage", error),
        };

        self.mutate(|state| match state.board_mut(board_id) {
            Some(cached) => {
                cached.stages.push(stage.clone());
                true
            }
            None => false,
        });

        ActionOutcome::Done(stage)
    }

    pub async fn delete_stage(&self, stage_id: Id) -> ActionOutcome {
        let (project_id, board) = match self.require_board() {
            Ok(found) => found,
            Err(precondition) => return precondition.into(),
        };

        let board_id = board.board.id;
        if let Err(error) = self.api.delete_stage(project_id, board_id, stage_id).await {
            return self.fail("delete_stage", error);
        }

        self.mutate(|state| {
            state
                .board_mut(board_id)
                .map_or(false, |cached| cached.remove_stage(stage_id))
        });

        ActionOutcome::Done(())
    }

    /// Ask the backend to place a stage after `leading_stage_id` (first when `None`).
    ///
    /// The cached order is not changed; reload the board to see the new order.
    pub async fn move_stage(&self, stage_id: Id, leading_stage_id: Option<Id>) -> ActionOutcome {
        let (project_id, board) = match self.require_board() {
            Ok(found) => found,
            Err(precondition) => return precondition.into(),
        };

        let board_id = board.board.id;
        let input = MoveStage::after(leading_stage_id);
        if let Err(error) = self
            .api
            .move_stage(project_id, board_id, stage_id, &input)
            .await
        {
            return self.fail("move_stage", error);
        }

        tracing::debug!(board_id, stage_id, ?leading_stage_id, "moved stage");
        ActionOutcome::Done(())
    }
}
