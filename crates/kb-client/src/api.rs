//! Backend port used by the store

use async_trait::async_trait;
use kb_core::result::KbResult;
use kb_core::traits::Id;
use kb_models::{
    AddProjectUser, Board, BoardFull, ChangeProjectUserRole, CreateBoard, CreateProject,
    CreateStage, MoveStage, Project, ProjectUser, Stage, UpdateBoard, UpdateProject,
};

/// Operations the tracker backend offers for projects, boards, stages and members
#[async_trait]
pub trait ProjectsApi: Send + Sync {
    /// GET /projects
    async fn list_projects(&self) -> KbResult<Vec<Project>>;

    /// GET /projects/{id}
    async fn get_project(&self, project_id: Id) -> KbResult<Project>;

    /// POST /projects
    async fn create_project(&self, input: &CreateProject) -> KbResult<Project>;

    /// PATCH /projects/{id}
    async fn update_project(&self, project_id: Id, input: &UpdateProject) -> KbResult<Project>;

    /// DELETE /projects/{id}
    async fn delete_project(&self, project_id: Id) -> KbResult<()>;

    /// POST /projects/{id}/boards
    async fn create_board(&self, project_id: Id, input: &CreateBoard) -> KbResult<Board>;

    /// GET /projects/{id}/boards/{boardId}
    async fn get_board(&self, project_id: Id, board_id: Id) -> KbResult<BoardFull>;

    /// PATCH /projects/{id}/boards/{boardId}
    async fn update_board(
        &self,
        project_id: Id,
        board_id: Id,
        input: &UpdateBoard,
    ) -> KbResult<Board>;

    /// DELETE /projects/{id}/boards/{boardId}
    async fn delete_board(&self, project_id: Id, board_id: Id) -> KbResult<()>;

    /// POST /projects/{id}/boards/{boardId}/stages
    async fn create_stage(
        &self,
        project_id: Id,
        board_id: Id,
        input: &CreateStage,
    ) -> KbResult<Stage>;

    /// DELETE /projects/{id}/boards/{boardId}/stages/{stageId}
    async fn delete_stage(&self, project_id: Id, board_id: Id, stage_id: Id) -> KbResult<()>;

    /// PATCH /projects/{id}/boards/{boardId}/stages/{stageId}/move
    ///
    /// The response body is discarded; the new order is only visible after a reload.
    async fn move_stage(
        &self,
        project_id: Id,
        board_id: Id,
        stage_id: Id,
        input: &MoveStage,
    ) -> KbResult<()>;

    /// PUT /projects/{id}/users
    async fn add_project_user(
        &self,
        project_id: Id,
        input: &AddProjectUser,
    ) -> KbResult<ProjectUser>;

    /// PATCH /projects/{id}/users/{username}
    async fn change_project_user_role(
        &self,
        project_id: Id,
        username: &str,
        input: &ChangeProjectUserRole,
    ) -> KbResult<ProjectUser>;

    /// DELETE /projects/{id}/users/{username}
    async fn remove_project_user(&self, project_id: Id, username: &str) -> KbResult<()>;
}
