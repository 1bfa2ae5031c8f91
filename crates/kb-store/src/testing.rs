//! Test doubles for the store: an in-memory backend and a `mockall` mock

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use fake::{Fake, Faker};
use kb_client::ProjectsApi;
use kb_core::{Id, KbError, KbResult};
use kb_models::{
    AddProjectUser, Board, BoardFull, ChangeProjectUserRole, CreateBoard, CreateProject,
    CreateStage, MoveStage, Project, ProjectUser, Role, Stage, UpdateBoard, UpdateProject,
};
use kb_notifications::MemoryNotifier;
use kb_router::{NavigationTarget, Navigator, Router};
use mockall::mock;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::store::ProjectsStore;

mock! {
    pub Api {}

    #[async_trait]
    impl ProjectsApi for Api {
        async fn list_projects(&self) -> KbResult<Vec<Project>>;
        async fn get_project(&self, project_id: Id) -> KbResult<Project>;
        async fn create_project(&self, input: &CreateProject) -> KbResult<Project>;
        async fn update_project(&self, project_id: Id, input: &UpdateProject) -> KbResult<Project>;
        async fn delete_project(&self, project_id: Id) -> KbResult<()>;
        async fn create_board(&self, project_id: Id, input: &CreateBoard) -> KbResult<Board>;
        async fn get_board(&self, project_id: Id, board_id: Id) -> KbResult<BoardFull>;
        async fn update_board(&self, project_id: Id, board_id: Id, input: &UpdateBoard) -> KbResult<Board>;
        async fn delete_board(&self, project_id: Id, board_id: Id) -> KbResult<()>;
        async fn create_stage(&self, project_id: Id, board_id: Id, input: &CreateStage) -> KbResult<Stage>;
        async fn delete_stage(&self, project_id: Id, board_id: Id, stage_id: Id) -> KbResult<()>;
        async fn move_stage(&self, project_id: Id, board_id: Id, stage_id: Id, input: &MoveStage) -> KbResult<()>;
        async fn add_project_user(&self, project_id: Id, input: &AddProjectUser) -> KbResult<ProjectUser>;
        async fn change_project_user_role(&self, project_id: Id, username: &str, input: &ChangeProjectUserRole) -> KbResult<ProjectUser>;
        async fn remove_project_user(&self, project_id: Id, username: &str) -> KbResult<()>;
    }
}

pub struct Fixture<A = FakeApi> {
    pub store: ProjectsStore,
    pub api: Arc<A>,
    pub notifier: Arc<MemoryNotifier>,
    pub router: Arc<Router>,
}

impl<A> Fixture<A> {
    /// Put the router on a path, as a user opening that page would
    pub fn visit(&self, path: &str) {
        self.router
            .navigate(NavigationTarget::path(path))
            .expect("test path should resolve");
    }

    pub fn current_path(&self) -> String {
        self.router.current().location.to_string()
    }
}

pub fn fixture() -> Fixture<FakeApi> {
    fixture_with(FakeApi::default())
}

pub fn fixture_with<A: ProjectsApi + 'static>(api: A) -> Fixture<A> {
    let api = Arc::new(api);
    let notifier = Arc::new(MemoryNotifier::new());
    let router = Arc::new(Router::app().expect("app routes compile"));
    let store = ProjectsStore::new(api.clone(), notifier.clone(), router.clone());
    Fixture {
        store,
        api,
        notifier,
        router,
    }
}

/// A generated project with no boards or members
pub fn sample_project(id: Id) -> Project {
    let mut project: Project = Faker.fake();
    project.id = id;
    project.boards.clear();
    project.users.clear();
    project
}

pub fn sample_board(id: Id) -> Board {
    let mut board: Board = Faker.fake();
    board.id = id;
    board.is_default = false;
    board
}

pub fn sample_stages(first_id: Id, count: usize) -> Vec<Stage> {
    (0..count)
        .map(|i| {
            let id = first_id + i as Id;
            Stage::new(id, format!("Stage {}", id))
        })
        .collect()
}

fn not_found(what: &str, id: impl std::fmt::Display) -> KbError {
    KbError::NotFound {
        message: format!("{} {} not found", what, id),
    }
}

#[derive(Default)]
struct Backend {
    projects: Vec<Project>,
    boards: HashMap<Id, (Id, BoardFull)>,
    next_id: Id,
    calls: Vec<String>,
}

impl Backend {
    fn next_id(&mut self) -> Id {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn project_mut(&mut self, project_id: Id) -> KbResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| not_found("Project", project_id))
    }

    fn board_mut(&mut self, project_id: Id, board_id: Id) -> KbResult<&mut BoardFull> {
        match self.boards.get_mut(&board_id) {
            Some((owner, board)) if *owner == project_id => Ok(board),
            _ => Err(not_found("Board", board_id)),
        }
    }
}

/// In-memory tracker backend.
///
/// Calls are recorded as `"METHOD /path"`. A call can be held with [`FakeApi::hold`]
/// until the returned [`Notify`] is signalled.
#[derive(Default)]
pub struct FakeApi {
    backend: Mutex<Backend>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeApi {
    pub fn with_project(self, project: Project) -> Self {
        self.backend.lock().projects.push(project);
        self
    }

    /// Add a board with stages; the project's board list gets its summary
    pub fn with_board(self, project_id: Id, board: Board, stages: Vec<Stage>) -> Self {
        {
            let mut backend = self.backend.lock();
            if let Ok(project) = backend.project_mut(project_id) {
                project.boards.push(board.clone());
            }
            backend
                .boards
                .insert(board.id, (project_id, BoardFull::new(board, stages)));
        }
        self
    }

    pub fn with_member(self, project_id: Id, member: ProjectUser) -> Self {
        if let Ok(project) = self.backend.lock().project_mut(project_id) {
            project.users.push(member);
        }
        self
    }

    pub fn hold(&self, call: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().insert(call.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.backend.lock().calls.clone()
    }

    async fn record(&self, call: String) {
        self.backend.lock().calls.push(call.clone());
        let gate = self.gates.lock().remove(&call);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl ProjectsApi for FakeApi {
    async fn list_projects(&self) -> KbResult<Vec<Project>> {
        self.record("GET /projects".into()).await;
        Ok(self.backend.lock().projects.clone())
    }

    async fn get_project(&self, project_id: Id) -> KbResult<Project> {
        self.record(format!("GET /projects/{}", project_id)).await;
        self.backend.lock().project_mut(project_id).map(|p| p.clone())
    }

    async fn create_project(&self, input: &CreateProject) -> KbResult<Project> {
        self.record("POST /projects".into()).await;
        let mut backend = self.backend.lock();
        let mut project = Project::new(backend.next_id(), input.name.clone());
        project.description = input.description.clone();
        backend.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(&self, project_id: Id, input: &UpdateProject) -> KbResult<Project> {
        self.record(format!("PATCH /projects/{}", project_id)).await;
        let mut backend = self.backend.lock();
        let project = backend.project_mut(project_id)?;
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = description.clone();
        }
        // Like the real backend, updates answer without the collections
        let mut response = project.clone();
        response.boards.clear();
        response.users.clear();
        Ok(response)
    }

    async fn delete_project(&self, project_id: Id) -> KbResult<()> {
        self.record(format!("DELETE /projects/{}", project_id)).await;
        let mut backend = self.backend.lock();
        backend.project_mut(project_id)?;
        backend.projects.retain(|p| p.id != project_id);
        backend.boards.retain(|_, (owner, _)| *owner != project_id);
        Ok(())
    }

    async fn create_board(&self, project_id: Id, input: &CreateBoard) -> KbResult<Board> {
        self.record(format!("POST /projects/{}/boards", project_id)).await;
        let mut backend = self.backend.lock();
        let board = Board::new(backend.next_id(), input.name.clone());
        backend.project_mut(project_id)?.boards.push(board.clone());
        backend
            .boards
            .insert(board.id, (project_id, BoardFull::new(board.clone(), Vec::new())));
        Ok(board)
    }

    async fn get_board(&self, project_id: Id, board_id: Id) -> KbResult<BoardFull> {
        self.record(format!("GET /projects/{}/boards/{}", project_id, board_id))
            .await;
        self.backend
            .lock()
            .board_mut(project_id, board_id)
            .map(|b| b.clone())
    }

    async fn update_board(
        &self,
        project_id: Id,
        board_id: Id,
        input: &UpdateBoard,
    ) -> KbResult<Board> {
        self.record(format!("PATCH /projects/{}/boards/{}", project_id, board_id))
            .await;
        let mut backend = self.backend.lock();
        let board = backend.board_mut(project_id, board_id)?;
        if let Some(name) = &input.name {
            board.board.name = name.clone();
        }
        let summary = board.board.clone();
        if let Some(entry) = backend
            .project_mut(project_id)?
            .boards
            .iter_mut()
            .find(|b| b.id == board_id)
        {
            entry.merge_from(&summary);
        }
        Ok(summary)
    }

    async fn delete_board(&self, project_id: Id, board_id: Id) -> KbResult<()> {
        self.record(format!("DELETE /projects/{}/boards/{}", project_id, board_id))
            .await;
        let mut backend = self.backend.lock();
        backend.board_mut(project_id, board_id)?;
        backend.boards.remove(&board_id);
        backend.project_mut(project_id)?.boards.retain(|b| b.id != board_id);
        Ok(())
    }

    async fn create_stage(
        &self,
        project_id: Id,
        board_id: Id,
        input: &CreateStage,
    ) -> KbResult<Stage> {
        self.record(format!(
            "POST /projects/{}/boards/{}/stages",
            project_id, board_id
        ))
        .await;
        let mut backend = self.backend.lock();
        let stage = Stage::new(backend.next_id(), input.name.clone());
        backend
            .board_mut(project_id, board_id)?
            .stages
            .push(stage.clone());
        Ok(stage)
    }

    async fn delete_stage(&self, project_id: Id, board_id: Id, stage_id: Id) -> KbResult<()> {
        self.record(format!(
            "DELETE /projects/{}/boards/{}/stages/{}",
            project_id, board_id, stage_id
        ))
        .await;
        let mut backend = self.backend.lock();
        if backend.board_mut(project_id, board_id)?.remove_stage(stage_id) {
            Ok(())
        } else {
            Err(not_found("Stage", stage_id))
        }
    }

    async fn move_stage(
        &self,
        project_id: Id,
        board_id: Id,
        stage_id: Id,
        input: &MoveStage,
    ) -> KbResult<()> {
        self.record(format!(
            "PATCH /projects/{}/boards/{}/stages/{}/move",
            project_id, board_id, stage_id
        ))
        .await;
        let mut backend = self.backend.lock();
        let board = backend.board_mut(project_id, board_id)?;
        if let Some(leading) = input.leading_stage_id {
            if board.stage(leading).is_none() {
                return Err(not_found("Stage", leading));
            }
        }
        let index = board
            .stages
            .iter()
            .position(|s| s.id == stage_id)
            .ok_or_else(|| not_found("Stage", stage_id))?;
        let stage = board.stages.remove(index);
        let insert_at = input
            .leading_stage_id
            .and_then(|leading| board.stages.iter().position(|s| s.id == leading))
            .map_or(0, |i| i + 1);
        board.stages.insert(insert_at, stage);
        Ok(())
    }

    async fn add_project_user(
        &self,
        project_id: Id,
        input: &AddProjectUser,
    ) -> KbResult<ProjectUser> {
        self.record(format!("PUT /projects/{}/users", project_id)).await;
        let mut backend = self.backend.lock();
        let member = ProjectUser::new(input.username.clone(), "member");
        backend.project_mut(project_id)?.users.push(member.clone());
        Ok(member)
    }

    async fn change_project_user_role(
        &self,
        project_id: Id,
        username: &str,
        input: &ChangeProjectUserRole,
    ) -> KbResult<ProjectUser> {
        self.record(format!("PATCH /projects/{}/users/{}", project_id, username))
            .await;
        let mut backend = self.backend.lock();
        let project = backend.project_mut(project_id)?;
        match project.users.iter_mut().find(|u| u.username() == username) {
            Some(member) => {
                member.role = Role::new(input.role_name.clone());
                Ok(member.clone())
            }
            // The backend accepts role changes for users the client has not loaded yet
            None => Ok(ProjectUser::new(username, input.role_name.clone())),
        }
    }

    async fn remove_project_user(&self, project_id: Id, username: &str) -> KbResult<()> {
        self.record(format!("DELETE /projects/{}/users/{}", project_id, username))
            .await;
        let mut backend = self.backend.lock();
        backend
            .project_mut(project_id)?
            .users
            .retain(|u| u.username() != username);
        Ok(())
    }
}
